//! Promotion picker overlay: four piece tiles over a dimmed board.
//!
//! Purely visual. Clicks are hit-tested by the model against the same regions.

use crate::models::PromotionChoiceView;
use crate::ui::theme::{CHOICE_BG, CHOICE_BORDER, OVERLAY_SCRIM, PIECE_SCALE};
use gpui::{div, img, prelude::*, px, rgb, rgba};

pub fn render_promotion_overlay(choices: &[PromotionChoiceView]) -> impl IntoElement + use<> {
    div()
        .absolute()
        .top_0()
        .left_0()
        .size_full()
        .bg(rgba(OVERLAY_SCRIM))
        .children(choices.iter().map(|choice| {
            let region = choice.region;
            div()
                .absolute()
                .left(px(region.x))
                .top(px(region.y))
                .size(px(region.size))
                .bg(rgb(CHOICE_BG))
                .border_1()
                .border_color(rgb(CHOICE_BORDER))
                .rounded_md()
                .flex()
                .items_center()
                .justify_center()
                .child(img(choice.piece.svg_path()).size(px(region.size * PIECE_SCALE)))
        }))
}
