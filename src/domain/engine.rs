//! The seam between the turn controller and whatever produces the reply move.

use std::time::Duration;

use thiserror::Error;

use crate::domain::board::GameBoard;
use crate::domain::chess::ChessMove;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to start engine `{path}`: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("engine I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine did not answer `{0}` in time")]
    Handshake(&'static str),
    #[error("engine gave no move within {0:?}")]
    Timeout(Duration),
    #[error("engine process exited")]
    Disconnected,
    #[error("engine has no move to play")]
    NoMove,
    #[error("unreadable engine reply: {0}")]
    MalformedReply(String),
    #[error("engine played an illegal move: {0}")]
    IllegalReply(ChessMove),
}

/// Something that can suggest a move for the side to move.
///
/// Calls block for at most roughly `budget`; implementations enforce that
/// themselves and report overruns as [`EngineError::Timeout`].
pub trait MoveEngine {
    fn suggest_move(&mut self, board: &GameBoard, budget: Duration) -> Result<ChessMove, EngineError>;

    /// Release the underlying resources. Further requests fail.
    fn shutdown(&mut self) {}
}
