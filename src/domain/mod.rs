pub mod board;
pub mod chess;
pub mod engine;
pub mod game_over;
pub mod input;
pub mod movegen;
pub mod promotion;
pub mod resolver;
pub mod turn;
pub mod uci;

pub use board::GameBoard;
pub use chess::{ChessMove, Piece, shakmaty_to_piece, to_row_col, to_square};
pub use engine::{EngineError, MoveEngine};
pub use game_over::GameStatus;
pub use input::PointerPos;
pub use turn::{TurnController, TurnPhase};
