//! Game end detection: a game is over when a king has been captured.
//!
//! There is no check, mate, stalemate or draw logic. Engine failures end the
//! game too, as [`GameStatus::Aborted`].

use shakmaty::Color;

use crate::domain::board::GameBoard;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    WhiteWon,
    BlackWon,
    Aborted { reason: String },
}

impl GameStatus {
    pub fn is_game_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    pub fn winner(&self) -> Option<Color> {
        match self {
            GameStatus::WhiteWon => Some(Color::White),
            GameStatus::BlackWon => Some(Color::Black),
            _ => None,
        }
    }

    /// Message for the status line; empty while the game runs
    pub fn message(&self) -> String {
        match self {
            GameStatus::InProgress => String::new(),
            GameStatus::WhiteWon => "White wins! Black king captured.".to_string(),
            GameStatus::BlackWon => "Black wins! White king captured.".to_string(),
            GameStatus::Aborted { reason } => format!("Engine error: {}", reason),
        }
    }
}

/// Inspect king presence after a move has been applied
pub fn detect(board: &GameBoard) -> GameStatus {
    let placement = board.board_fen();
    if !placement.contains('K') {
        GameStatus::BlackWon
    } else if !placement.contains('k') {
        GameStatus::WhiteWon
    } else {
        GameStatus::InProgress
    }
}
