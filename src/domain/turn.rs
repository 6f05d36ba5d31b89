//! Turn controller: the single owner of the board, the drag tracker and the
//! engine adapter.
//!
//! ```text
//! AwaitingHumanMove --valid move--> (apply) --+--> RequestingEngineMove --reply--> (apply) --> AwaitingHumanMove
//!        |                                    |              |
//!        +--pawn to edge rank--> AwaitingPromotionChoice     +--failure--> GameOver(aborted)
//!                                             |
//!                               king captured +--> GameOver(won)
//! ```
//!
//! Every applied move, human or engine, goes through the game-over check.

use std::time::Duration;

use shakmaty::{Color, Role, Square};
use tracing::{debug, error, info, warn};

use crate::domain::board::GameBoard;
use crate::domain::chess::ChessMove;
use crate::domain::engine::{EngineError, MoveEngine};
use crate::domain::game_over::{self, GameStatus};
use crate::domain::input::{DragPhase, DragState, DragTracker, PointerPos};
use crate::domain::promotion::PromotionPicker;
use crate::domain::resolver::{self, Candidate, MoveRejected};

pub const INVALID_MOVE_NOTICE: &str = "Invalid move!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSide {
    Human,
    Engine,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingHumanMove,
    AwaitingPromotionChoice(PromotionPicker),
    RequestingEngineMove,
    GameOver,
}

/// Result of feeding one interaction into the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Not applicable in the current phase, or nothing to resolve
    Ignored,
    Rejected(MoveRejected),
    PromotionRequested,
    Applied(ChessMove),
}

pub struct TurnController<E> {
    board: GameBoard,
    drag: DragTracker,
    phase: TurnPhase,
    status: GameStatus,
    engine: E,
    human: Color,
    budget: Duration,
    rejection: Option<&'static str>,
}

impl<E: MoveEngine> TurnController<E> {
    /// The human plays White. If `board` has Black to move the engine goes first.
    pub fn new(board: GameBoard, engine: E, budget: Duration) -> Self {
        let mut controller = Self {
            board,
            drag: DragTracker::new(),
            phase: TurnPhase::AwaitingHumanMove,
            status: GameStatus::InProgress,
            engine,
            human: Color::White,
            budget,
            rejection: None,
        };
        controller.after_move();
        controller
    }

    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.drag()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.phase() == DragPhase::Dragging
    }

    pub fn active_side(&self) -> ActiveSide {
        if self.board.turn() == self.human {
            ActiveSide::Human
        } else {
            ActiveSide::Engine
        }
    }

    pub fn promotion(&self) -> Option<PromotionPicker> {
        match self.phase {
            TurnPhase::AwaitingPromotionChoice(picker) => Some(picker),
            _ => None,
        }
    }

    pub fn accepts_input(&self) -> bool {
        self.phase == TurnPhase::AwaitingHumanMove
    }

    pub fn needs_engine(&self) -> bool {
        self.phase == TurnPhase::RequestingEngineMove
    }

    /// Text for the status line
    pub fn notice(&self) -> String {
        if self.status.is_game_over() {
            return self.status.message();
        }
        match (self.phase, self.rejection) {
            (TurnPhase::AwaitingPromotionChoice(_), _) => "Choose a promotion piece".to_string(),
            (TurnPhase::RequestingEngineMove, _) => "Engine is thinking...".to_string(),
            (_, Some(reason)) => reason.to_string(),
            _ => String::new(),
        }
    }

    pub fn press(&mut self, square: Option<Square>, pointer: PointerPos) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let started = self.drag.press(square, pointer, &self.board);
        if started {
            debug!(square = ?square, "drag started");
        }
        started
    }

    pub fn drag_to(&mut self, pointer: PointerPos) -> bool {
        self.drag.move_to(pointer)
    }

    pub fn release(&mut self, square: Option<Square>) -> MoveOutcome {
        // the tracker is idle after this whatever the outcome
        let Some(release) = self.drag.release(square) else {
            return MoveOutcome::Ignored;
        };
        if !self.accepts_input() {
            return MoveOutcome::Ignored;
        }

        match resolver::candidate_from_release(&release) {
            Candidate::Ready(mv) => self.submit_human_move(mv),
            Candidate::NeedsPromotion(pending) => {
                debug!(from = %pending.from, to = %pending.to, "awaiting promotion choice");
                self.phase = TurnPhase::AwaitingPromotionChoice(PromotionPicker::new(pending));
                MoveOutcome::PromotionRequested
            }
        }
    }

    pub fn choose_promotion(&mut self, role: Role) -> MoveOutcome {
        let TurnPhase::AwaitingPromotionChoice(picker) = self.phase else {
            return MoveOutcome::Ignored;
        };
        if !picker.choices().iter().any(|p| p.role == role) {
            return MoveOutcome::Ignored;
        }
        self.phase = TurnPhase::AwaitingHumanMove;
        self.submit_human_move(picker.pending().complete(role))
    }

    /// A click while the picker is open. Misses are ignored.
    pub fn click_promotion(&mut self, pos: PointerPos, center_x: f32, center_y: f32) -> MoveOutcome {
        let Some(picker) = self.promotion() else {
            return MoveOutcome::Ignored;
        };
        match picker.hit_test(pos, center_x, center_y) {
            Some(role) => self.choose_promotion(role),
            None => MoveOutcome::Ignored,
        }
    }

    /// Ask the engine for its reply and apply it. Blocks for about the budget.
    pub fn play_engine_turn(&mut self) -> Option<ChessMove> {
        if !self.needs_engine() {
            return None;
        }

        let reply = self
            .engine
            .suggest_move(&self.board, self.budget)
            .and_then(|mv| {
                resolver::validate(&self.board, mv).map_err(|r| EngineError::IllegalReply(r.attempted))
            });

        match reply {
            Ok(mv) => {
                info!(mv = %mv, "engine move");
                self.apply(mv);
                Some(mv)
            }
            Err(e) => {
                error!("engine failure: {}", e);
                self.drag.cancel();
                self.status = GameStatus::Aborted {
                    reason: e.to_string(),
                };
                self.phase = TurnPhase::GameOver;
                None
            }
        }
    }

    /// External quit: stop accepting moves and release the engine.
    ///
    /// `status` keeps the result of play, so a game quit midway stays
    /// `InProgress` while the phase is `GameOver`.
    pub fn quit(&mut self) {
        info!("quit requested");
        self.drag.cancel();
        self.phase = TurnPhase::GameOver;
        self.engine.shutdown();
    }

    fn submit_human_move(&mut self, mv: ChessMove) -> MoveOutcome {
        match resolver::validate(&self.board, mv) {
            Ok(mv) => {
                info!(mv = %mv, "human move");
                self.apply(mv);
                MoveOutcome::Applied(mv)
            }
            Err(rejected) => {
                warn!("{}", rejected);
                self.rejection = Some(INVALID_MOVE_NOTICE);
                MoveOutcome::Rejected(rejected)
            }
        }
    }

    fn apply(&mut self, mv: ChessMove) {
        self.board.play(&mv);
        self.rejection = None;
        self.after_move();
    }

    fn after_move(&mut self) {
        self.status = game_over::detect(&self.board);
        self.phase = if self.status.is_game_over() {
            info!(status = ?self.status, winner = ?self.status.winner(), "game over");
            TurnPhase::GameOver
        } else {
            match self.active_side() {
                ActiveSide::Human => TurnPhase::AwaitingHumanMove,
                ActiveSide::Engine => TurnPhase::RequestingEngineMove,
            }
        };
    }
}
