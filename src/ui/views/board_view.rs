//! Chess board view - the board with drag-and-drop piece movement, the
//! promotion overlay and the status line.

use gpui::{
    Context, Entity, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Subscription, Window,
    canvas, div, img, prelude::*, px, rgb,
};

use crate::models::GameModel;
use crate::ui::components::{render_promotion_overlay, render_square};
use crate::ui::theme::{BOARD_PADDING, PANEL_BG};
use crate::ui::views::render_status_bar;

/// The main chess board view that observes a GameModel
pub struct ChessBoardView {
    model: Entity<GameModel>,
    _subscription: Subscription,
}

impl ChessBoardView {
    pub fn new(model: Entity<GameModel>, cx: &mut Context<Self>) -> Self {
        let _subscription = cx.observe(&model, |_, _, cx| cx.notify());
        Self {
            model,
            _subscription,
        }
    }
}

impl Render for ChessBoardView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let model_down = self.model.clone();
        let model_move = self.model.clone();
        let model_up = self.model.clone();
        let model_up_out = self.model.clone();
        let model_measure = self.model.clone();

        let game = self.model.read(cx);
        let layout = game.layout();
        let drag = game.drag_view();
        let dragging_from = drag.map(|d| (d.from_row, d.from_col));
        let square_size = layout.square_size();
        let piece_size = layout.piece_size();
        let board_total_size = layout.board_total_size();

        // Floating piece follows cursor during drag
        let floating_piece = drag.map(|d| {
            div()
                .absolute()
                .left(px(d.mouse_x - piece_size / 2.0))
                .top(px(d.mouse_y - piece_size / 2.0))
                .size(px(piece_size))
                .child(img(d.piece.svg_path()).size(px(piece_size)))
        });

        let promotion_overlay = game
            .promotion_choices()
            .map(|choices| render_promotion_overlay(&choices));

        let status_bar = render_status_bar(game);

        // Collect pieces for rendering (can't borrow game in closure)
        let pieces: Vec<_> = (0..8)
            .flat_map(|row| (0..8).map(move |col| (row, col)))
            .map(|(row, col)| game.piece_at(row, col))
            .collect();

        let board = div()
            .flex_shrink_0()
            .flex()
            .flex_col()
            .w(px(board_total_size))
            .h(px(board_total_size))
            .overflow_hidden()
            .rounded_md()
            .children((0..8).map(|row| {
                div().flex().flex_shrink_0().children((0..8).map(|col| {
                    let is_being_dragged = dragging_from == Some((row, col));
                    render_square(row, col, pieces[row * 8 + col], is_being_dragged, square_size, piece_size)
                }))
            }));

        let board_panel_content = div()
            .id("board-panel")
            .relative()
            .size_full()
            .overflow_hidden()
            .bg(rgb(PANEL_BG))
            .p(px(BOARD_PADDING))
            .child(board)
            .when_some(floating_piece, |el, fp| el.child(fp))
            .when_some(promotion_overlay, |el, overlay| el.child(overlay))
            // Mouse down: start a drag, or pick a promotion piece
            .on_mouse_down(
                MouseButton::Left,
                move |ev: &MouseDownEvent, _window, cx| {
                    model_down.update(cx, |game, cx| {
                        let pos = ev.position;
                        if game.mouse_down(pos.x.into(), pos.y.into(), cx) {
                            cx.notify();
                        }
                    });
                },
            )
            // Mouse move: update drag position
            .on_mouse_move(move |ev: &MouseMoveEvent, _, cx| {
                model_move.update(cx, |game, cx| {
                    if game.mouse_move(ev.position.x.into(), ev.position.y.into()) {
                        cx.notify();
                    }
                });
            })
            // Mouse up: complete the move
            .on_mouse_up(MouseButton::Left, move |ev: &MouseUpEvent, _window, cx| {
                model_up.update(cx, |game, cx| {
                    let pos = ev.position;
                    if game.mouse_up(pos.x.into(), pos.y.into(), cx) {
                        cx.notify();
                    }
                });
            })
            // Released over the status bar or outside the window: drop the drag
            .on_mouse_up_out(MouseButton::Left, move |_: &MouseUpEvent, _window, cx| {
                model_up_out.update(cx, |game, cx| {
                    if game.mouse_up_outside() {
                        cx.notify();
                    }
                });
            });

        // Canvas to measure actual panel size
        let measure_canvas = canvas(
            move |bounds, _window, cx| {
                model_measure.update(cx, |game, cx| {
                    if game.set_panel_size(bounds.size) {
                        cx.notify();
                    }
                });
            },
            |_, _, _, _| {},
        )
        .absolute()
        .top_0()
        .left_0()
        .size_full();

        let board_panel_with_measure = div()
            .relative()
            .flex_1()
            .child(measure_canvas)
            .child(board_panel_content);

        div()
            .size_full()
            .flex()
            .flex_col()
            .bg(rgb(PANEL_BG))
            .child(board_panel_with_measure)
            .child(status_bar)
    }
}
