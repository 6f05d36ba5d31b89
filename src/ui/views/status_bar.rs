//! Status line under the board: rejections, engine activity and the result.

use gpui::{div, prelude::*, px, rgb};

use crate::models::GameModel;
use crate::ui::theme::{BOARD_PADDING, STATUS_BAR_HEIGHT, TEXT_ALERT, TEXT_SECONDARY};

pub fn render_status_bar(game: &GameModel) -> impl IntoElement {
    let color = if game.status().is_game_over() {
        TEXT_ALERT
    } else {
        TEXT_SECONDARY
    };

    div()
        .flex_shrink_0()
        .h(px(STATUS_BAR_HEIGHT))
        .px(px(BOARD_PADDING))
        .flex()
        .items_center()
        .text_sm()
        .text_color(rgb(color))
        .child(game.notice())
}
