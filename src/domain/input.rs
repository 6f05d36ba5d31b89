//! Pointer drag lifecycle: idle -> dragging -> released.
//!
//! Screen coordinates are resolved to squares by the UI layout before they get
//! here; a pointer outside the board arrives as `None`.

use shakmaty::{Piece, Square};

use crate::domain::board::GameBoard;

/// Pointer position relative to the board panel, only used for drawing the
/// carried piece.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPos {
    pub x: f32,
    pub y: f32,
}

impl PointerPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// State for a piece being dragged
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragState {
    pub origin: Square,
    pub piece: Piece,
    pub pointer: PointerPos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
}

/// What a completed drag hands to the move resolver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragRelease {
    pub origin: Square,
    pub destination: Square,
    pub piece: Piece,
}

#[derive(Clone, Debug, Default)]
pub struct DragTracker {
    drag: Option<DragState>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        match self.drag {
            Some(_) => DragPhase::Dragging,
            None => DragPhase::Idle,
        }
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    /// Start dragging if `square` holds a piece of the side to move.
    /// Returns whether a drag started.
    pub fn press(&mut self, square: Option<Square>, pointer: PointerPos, board: &GameBoard) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let Some(origin) = square else {
            return false;
        };
        match board.piece_at(origin) {
            Some(piece) if piece.color == board.turn() => {
                self.drag = Some(DragState {
                    origin,
                    piece,
                    pointer,
                });
                true
            }
            _ => false,
        }
    }

    /// Follow the pointer. Returns whether anything changed.
    pub fn move_to(&mut self, pointer: PointerPos) -> bool {
        match self.drag.as_mut() {
            Some(drag) => {
                drag.pointer = pointer;
                true
            }
            None => false,
        }
    }

    /// Finish the drag. The tracker is idle afterwards no matter what; a
    /// release off the board or without a drag yields nothing.
    pub fn release(&mut self, square: Option<Square>) -> Option<DragRelease> {
        let drag = self.drag.take()?;
        let destination = square?;
        Some(DragRelease {
            origin: drag.origin,
            destination,
            piece: drag.piece,
        })
    }

    pub fn cancel(&mut self) {
        self.drag = None;
    }
}
