//! Board model: piece placement, side to move and move application.
//!
//! Wraps a shakmaty [`Setup`] rather than [`shakmaty::Chess`], because `Chess`
//! refuses positions where a king is missing. That is how games end here: a
//! king gets captured and the position stays representable.

use shakmaty::fen::{Fen, LossyFenError, ParseFenError};
use shakmaty::{Bitboard, Board, Color, File, Piece, Rank, Role, Setup, Square};
use thiserror::Error;

use crate::domain::chess::ChessMove;
use crate::domain::movegen;

#[derive(Error, Debug)]
pub enum FenError {
    #[error("invalid FEN: {0}")]
    Parse(#[from] ParseFenError),
    #[error("en passant square {0} does not fit the side to move")]
    EnPassant(Square),
}

/// The game position. Mutated only through [`GameBoard::play`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameBoard {
    setup: Setup,
}

impl GameBoard {
    /// Standard starting position, white to move
    pub fn new() -> Self {
        Self {
            setup: Setup::initial(),
        }
    }

    /// Parse a FEN. Missing kings are allowed; the trailing fields are optional.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let setup = Fen::from_ascii(fen.trim().as_bytes())?.into_setup();

        // the square a double push skipped: rank 6 when white is to move, rank 3 otherwise
        if let Some(ep) = setup.ep_square {
            let expected = match setup.turn {
                Color::White => Rank::Sixth,
                Color::Black => Rank::Third,
            };
            if ep.rank() != expected {
                return Err(FenError::EnPassant(ep));
            }
        }

        Ok(Self { setup })
    }

    pub fn board(&self) -> &Board {
        &self.setup.board
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.setup.board.piece_at(sq)
    }

    pub fn turn(&self) -> Color {
        self.setup.turn
    }

    /// Rook squares that still carry a castling right
    pub fn castling_rights(&self) -> Bitboard {
        self.setup.castling_rights
    }

    pub fn ep_square(&self) -> Option<Square> {
        self.setup.ep_square
    }

    pub fn has_king(&self, color: Color) -> bool {
        (self.setup.board.kings() & self.setup.board.by_color(color)).any()
    }

    /// Every move allowed by piece geometry and turn ownership. King safety is
    /// not considered, so capturing the enemy king is a normal capture.
    pub fn pseudo_legal_moves(&self) -> Vec<ChessMove> {
        movegen::pseudo_legal_moves(self)
    }

    pub fn is_pseudo_legal(&self, mv: &ChessMove) -> bool {
        // cheap filter before generating everything
        match self.piece_at(mv.from) {
            Some(piece) if piece.color == self.turn() => {}
            _ => return false,
        }
        self.pseudo_legal_moves().contains(mv)
    }

    /// Apply a move without validating it. Callers check
    /// [`GameBoard::is_pseudo_legal`] first.
    pub fn play(&mut self, mv: &ChessMove) {
        let setup = &mut self.setup;
        let Some(piece) = setup.board.remove_piece_at(mv.from) else {
            return;
        };
        let mut is_capture = setup.board.remove_piece_at(mv.to).is_some();

        if piece.role == Role::Pawn
            && !is_capture
            && Some(mv.to) == setup.ep_square
            && mv.from.file() != mv.to.file()
        {
            let victim = Square::from_coords(mv.to.file(), mv.from.rank());
            is_capture = setup.board.remove_piece_at(victim).is_some();
        }

        if piece.role == Role::King && file_distance(mv.from, mv.to) == 2 {
            let (rook_from, rook_to) = if mv.to.file() == File::G {
                (File::H, File::F)
            } else {
                (File::A, File::D)
            };
            let rank = mv.from.rank();
            if let Some(rook) = setup
                .board
                .remove_piece_at(Square::from_coords(rook_from, rank))
            {
                setup
                    .board
                    .set_piece_at(Square::from_coords(rook_to, rank), rook);
            }
        }

        let placed = match mv.promotion {
            Some(role) if piece.role == Role::Pawn => Piece {
                color: piece.color,
                role,
            },
            _ => piece,
        };
        setup.board.set_piece_at(mv.to, placed);

        if piece.role == Role::King {
            setup.castling_rights &= !Bitboard::from_rank(piece.color.backrank());
        }
        // a rook leaving or being taken on its home square
        setup.castling_rights.discard(mv.from);
        setup.castling_rights.discard(mv.to);

        setup.ep_square = if piece.role == Role::Pawn && rank_distance(mv.from, mv.to) == 2 {
            let mid = (u32::from(mv.from.rank()) + u32::from(mv.to.rank())) / 2;
            Some(Square::from_coords(mv.from.file(), Rank::new(mid)))
        } else {
            None
        };

        if piece.role == Role::Pawn || is_capture {
            setup.halfmoves = 0;
        } else {
            setup.halfmoves = setup.halfmoves.saturating_add(1);
        }
        if setup.turn == Color::Black {
            setup.fullmoves = setup.fullmoves.saturating_add(1);
        }
        setup.turn = !setup.turn;
    }

    /// Piece placement part of a FEN, rank 8 first.
    pub fn board_fen(&self) -> String {
        self.setup.board.to_string()
    }

    /// Full FEN as sent to the engine
    pub fn fen(&self) -> String {
        Fen::try_from_setup(self.setup.clone())
            .unwrap_or_else(LossyFenError::ignore)
            .to_string()
    }
}

impl Default for GameBoard {
    fn default() -> Self {
        Self::new()
    }
}

fn file_distance(a: Square, b: Square) -> u32 {
    u32::from(a.file()).abs_diff(u32::from(b.file()))
}

fn rank_distance(a: Square, b: Square) -> u32 {
    u32::from(a.rank()).abs_diff(u32::from(b.rank()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_initial_position() {
        let board = GameBoard::new();
        assert_eq!(board.fen(), START_FEN);
        assert_eq!(board.turn(), Color::White);
        assert!(board.has_king(Color::White));
        assert!(board.has_king(Color::Black));
    }

    #[test]
    fn test_fen_parse_matches_new() {
        assert_eq!(GameBoard::from_fen(START_FEN).unwrap(), GameBoard::new());
    }

    #[test]
    fn test_fen_without_king_is_accepted() {
        let board = GameBoard::from_fen("8/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert!(board.has_king(Color::White));
        assert!(!board.has_king(Color::Black));
    }

    #[test]
    fn test_fen_rejects_bad_placement() {
        assert!(GameBoard::from_fen("8/8/8").is_err());
        assert!(GameBoard::from_fen("9/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(GameBoard::from_fen("8/8/8/8/8/8/8/7X w - - 0 1").is_err());
        assert!(GameBoard::from_fen("08/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(matches!(
            GameBoard::from_fen("8/8/8/8/8/8/8/8 x - - 0 1"),
            Err(FenError::Parse(_))
        ));
    }

    #[test]
    fn test_fen_en_passant_rank_follows_turn() {
        let board = GameBoard::from_fen("4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 2").unwrap();
        assert_eq!(board.ep_square(), Some(Square::E6));
        assert!(matches!(
            GameBoard::from_fen("4k3/8/8/3Pp3/8/8/8/4K3 w - e3 0 2"),
            Err(FenError::EnPassant(Square::E3))
        ));
        assert!(matches!(
            GameBoard::from_fen("4k3/8/8/8/8/8/8/4K3 b - e5 0 1"),
            Err(FenError::EnPassant(Square::E5))
        ));
    }

    #[test]
    fn test_fen_round_trip_keeps_rights() {
        let fen = "r3k2r/8/8/8/4P3/8/8/R3K2R b Kq e3 4 17";
        assert_eq!(GameBoard::from_fen(fen).unwrap().fen(), fen);
    }

    #[test]
    fn test_play_double_push_sets_ep_and_flips_turn() {
        let mut board = GameBoard::new();
        board.play(&ChessMove::new(Square::E2, Square::E4));
        assert_eq!(board.turn(), Color::Black);
        assert_eq!(board.ep_square(), Some(Square::E3));
        assert_eq!(
            board.fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn test_play_en_passant_removes_victim() {
        let mut board =
            GameBoard::from_fen("4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 2").unwrap();
        board.play(&ChessMove::new(Square::D5, Square::E6));
        assert_eq!(board.piece_at(Square::E5), None);
        assert_eq!(
            board.piece_at(Square::E6),
            Some(Piece {
                color: Color::White,
                role: Role::Pawn
            })
        );
    }

    #[test]
    fn test_play_castling_moves_rook_and_clears_rights() {
        let mut board =
            GameBoard::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        board.play(&ChessMove::new(Square::E1, Square::G1));
        assert_eq!(board.piece_at(Square::H1), None);
        assert_eq!(board.piece_at(Square::F1).map(|p| p.role), Some(Role::Rook));
        assert_eq!(board.piece_at(Square::G1).map(|p| p.role), Some(Role::King));
        assert!(!board.castling_rights().contains(Square::H1));
        assert!(!board.castling_rights().contains(Square::A1));
        assert!(board.castling_rights().contains(Square::H8));

        board.play(&ChessMove::new(Square::E8, Square::C8));
        assert_eq!(board.piece_at(Square::D8).map(|p| p.role), Some(Role::Rook));
        assert_eq!(board.piece_at(Square::A8), None);
    }

    #[test]
    fn test_rook_capture_clears_right() {
        let mut board =
            GameBoard::from_fen("4k2r/8/8/8/8/8/8/4K2R w Kk - 0 1").unwrap();
        board.play(&ChessMove::new(Square::H1, Square::H8));
        assert!(!board.castling_rights().contains(Square::H1));
        assert!(!board.castling_rights().contains(Square::H8));
        assert!(board.fen().starts_with("4k2R/8/8/8/8/8/8/4K3 b - - "));
    }

    #[test]
    fn test_play_promotion_replaces_pawn() {
        let mut board = GameBoard::from_fen("7k/4P3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        board.play(&ChessMove::with_promotion(Square::E7, Square::E8, Role::Queen));
        assert_eq!(board.piece_at(Square::E7), None);
        assert_eq!(
            board.piece_at(Square::E8),
            Some(Piece {
                color: Color::White,
                role: Role::Queen
            })
        );
    }

    #[test]
    fn test_king_capture_removes_king() {
        let mut board = GameBoard::from_fen("4k3/8/8/8/8/8/8/4KQ2 w - - 0 1").unwrap();
        board.play(&ChessMove::new(Square::F1, Square::E2));
        board.play(&ChessMove::new(Square::E8, Square::E7));
        // queen e2 takes the king on e7
        board.play(&ChessMove::new(Square::E2, Square::E7));
        assert!(!board.has_king(Color::Black));
        assert!(!board.board_fen().contains('k'));
        assert!(board.board_fen().contains('K'));
    }

    #[test]
    fn test_counters() {
        let mut board = GameBoard::new();
        board.play(&ChessMove::new(Square::G1, Square::F3));
        board.play(&ChessMove::new(Square::G8, Square::F6));
        assert!(board.fen().ends_with(" 2 2"));
        board.play(&ChessMove::new(Square::E2, Square::E4));
        assert!(board.fen().ends_with(" 0 2"));
    }
}
