//! Square rendering component.

use crate::domain::Piece;
use crate::ui::theme::{GHOST_OPACITY, square_color};
use gpui::{div, img, prelude::*, px};

/// Render a single board square with optional piece
pub fn render_square(
    row: usize,
    col: usize,
    piece: Option<Piece>,
    is_being_dragged: bool,
    square_size: f32,
    piece_size: f32,
) -> impl IntoElement {
    div()
        .flex_shrink_0() // never shrink - maintain aspect ratio
        .size(px(square_size))
        .bg(square_color(row, col))
        .when_some(piece, |el, p| {
            // the dragged piece leaves a ghost on its origin square
            el.child(
                div()
                    .size_full()
                    .flex()
                    .items_center()
                    .justify_center()
                    .when(is_being_dragged, |d| d.opacity(GHOST_OPACITY))
                    .child(img(p.svg_path()).size(px(piece_size))),
            )
        })
}
