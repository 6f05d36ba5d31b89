//! Game state model - the application layer between the turn controller and
//! the board view.

use std::time::Duration;

use gpui::{AsyncApp, Context, Pixels, Size, Task, WeakEntity};
use tracing::debug;

use crate::domain::promotion::ChoiceRegion;
use crate::domain::turn::MoveOutcome;
use crate::domain::{
    GameBoard, GameStatus, Piece, PointerPos, TurnController, TurnPhase, shakmaty_to_piece, to_row_col,
    to_square,
};
use crate::models::UciEngine;
use crate::ui::BoardLayout;

/// Delay before the engine is asked, so the human move is drawn first
const ENGINE_TURN_DELAY: Duration = Duration::from_millis(16);

/// What the view needs to draw the carried piece
#[derive(Clone, Copy, Debug)]
pub struct DragView {
    pub piece: Piece,
    pub from_row: usize,
    pub from_col: usize,
    /// Mouse position relative to the board panel
    pub mouse_x: f32,
    pub mouse_y: f32,
}

/// A promotion choice laid out for drawing
#[derive(Clone, Copy, Debug)]
pub struct PromotionChoiceView {
    pub piece: Piece,
    pub region: ChoiceRegion,
}

pub struct GameModel {
    controller: TurnController<UciEngine>,
    layout: BoardLayout,
    /// Pending engine request (kept alive until it ran)
    _engine_task: Option<Task<()>>,
}

impl GameModel {
    pub fn new(board: GameBoard, engine: UciEngine, budget: Duration) -> Self {
        Self {
            controller: TurnController::new(board, engine, budget),
            layout: BoardLayout::default(),
            _engine_task: None,
        }
    }

    pub fn layout(&self) -> BoardLayout {
        self.layout
    }

    /// Returns whether the size changed
    pub fn set_panel_size(&mut self, size: Size<Pixels>) -> bool {
        if self.layout.panel_size == size {
            return false;
        }
        self.layout = BoardLayout::new(size);
        true
    }

    pub fn status(&self) -> &GameStatus {
        self.controller.status()
    }

    pub fn notice(&self) -> String {
        self.controller.notice()
    }

    /// Get piece at row/col (row 0 = rank 8)
    pub fn piece_at(&self, row: usize, col: usize) -> Option<Piece> {
        self.controller
            .board()
            .piece_at(to_square(row, col))
            .map(shakmaty_to_piece)
    }

    pub fn drag_view(&self) -> Option<DragView> {
        self.controller.drag().map(|drag| {
            let (from_row, from_col) = to_row_col(drag.origin);
            DragView {
                piece: shakmaty_to_piece(drag.piece),
                from_row,
                from_col,
                mouse_x: drag.pointer.x,
                mouse_y: drag.pointer.y,
            }
        })
    }

    pub fn promotion_choices(&self) -> Option<Vec<PromotionChoiceView>> {
        let picker = self.controller.promotion()?;
        let (cx, cy) = self.layout.board_center();
        let regions = picker.regions(cx, cy);
        Some(
            picker
                .choices()
                .into_iter()
                .zip(regions)
                .map(|(piece, region)| PromotionChoiceView {
                    piece: shakmaty_to_piece(piece),
                    region,
                })
                .collect(),
        )
    }

    pub fn is_choosing_promotion(&self) -> bool {
        matches!(self.controller.phase(), TurnPhase::AwaitingPromotionChoice(_))
    }

    pub fn mouse_down(&mut self, x: f32, y: f32, cx: &mut Context<Self>) -> bool {
        let pos = PointerPos::new(x, y);
        if self.is_choosing_promotion() {
            let (center_x, center_y) = self.layout.board_center();
            let outcome = self.controller.click_promotion(pos, center_x, center_y);
            return self.handle_outcome(outcome, cx);
        }
        let square = self.layout.pos_to_square(x, y);
        self.controller.press(square, pos)
    }

    pub fn mouse_move(&mut self, x: f32, y: f32) -> bool {
        self.controller.drag_to(PointerPos::new(x, y))
    }

    pub fn mouse_up(&mut self, x: f32, y: f32, cx: &mut Context<Self>) -> bool {
        let had_drag = self.controller.is_dragging();
        let square = self.layout.pos_to_square(x, y);
        let outcome = self.controller.release(square);
        self.handle_outcome(outcome, cx) || had_drag
    }

    /// A button release anywhere off the board panel ends the drag with no move
    pub fn mouse_up_outside(&mut self) -> bool {
        let had_drag = self.controller.is_dragging();
        self.controller.release(None);
        had_drag
    }

    pub fn quit(&mut self) {
        self._engine_task = None;
        self.controller.quit();
    }

    fn handle_outcome(&mut self, outcome: MoveOutcome, cx: &mut Context<Self>) -> bool {
        match outcome {
            MoveOutcome::Ignored => false,
            MoveOutcome::Rejected(_) | MoveOutcome::PromotionRequested => true,
            MoveOutcome::Applied(_) => {
                self.schedule_engine_turn(cx);
                true
            }
        }
    }

    /// Run the engine on the next frame if it is its turn
    pub fn schedule_engine_turn(&mut self, cx: &mut Context<Self>) {
        if !self.controller.needs_engine() {
            return;
        }
        debug!("engine turn scheduled");
        let task = cx.spawn(async move |weak_entity: WeakEntity<GameModel>, cx: &mut AsyncApp| {
            cx.background_executor().timer(ENGINE_TURN_DELAY).await;
            let _ = weak_entity.update(cx, |game, cx| {
                game.controller.play_engine_turn();
                cx.notify();
            });
        });
        self._engine_task = Some(task);
    }
}

