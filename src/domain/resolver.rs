//! Turns a finished drag into a move and checks it against the
//! pseudo-legal move set.

use shakmaty::{Color, Piece, Rank, Role, Square};
use thiserror::Error;

use crate::domain::board::GameBoard;
use crate::domain::chess::ChessMove;
use crate::domain::input::DragRelease;

/// A move outside the pseudo-legal set. The board is left untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid move {attempted}")]
pub struct MoveRejected {
    pub attempted: ChessMove,
}

/// A pawn move that is waiting for the promotion piece
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingPromotion {
    pub from: Square,
    pub to: Square,
    pub color: Color,
}

impl PendingPromotion {
    pub fn complete(self, role: Role) -> ChessMove {
        ChessMove::with_promotion(self.from, self.to, role)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Candidate {
    Ready(ChessMove),
    NeedsPromotion(PendingPromotion),
}

/// A pawn landing on the first or last rank needs a promotion choice. Only
/// the rank is looked at, so legality is decided afterwards.
pub fn needs_promotion(piece: Piece, destination: Square) -> bool {
    piece.role == Role::Pawn && matches!(destination.rank(), Rank::First | Rank::Eighth)
}

pub fn candidate_from_release(release: &DragRelease) -> Candidate {
    if needs_promotion(release.piece, release.destination) {
        Candidate::NeedsPromotion(PendingPromotion {
            from: release.origin,
            to: release.destination,
            color: release.piece.color,
        })
    } else {
        Candidate::Ready(ChessMove::new(release.origin, release.destination))
    }
}

pub fn validate(board: &GameBoard, mv: ChessMove) -> Result<ChessMove, MoveRejected> {
    if board.is_pseudo_legal(&mv) {
        Ok(mv)
    } else {
        Err(MoveRejected { attempted: mv })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(board: &GameBoard, from: Square, to: Square) -> DragRelease {
        DragRelease {
            origin: from,
            destination: to,
            piece: board.piece_at(from).unwrap(),
        }
    }

    #[test]
    fn test_ordinary_move_is_ready() {
        let board = GameBoard::new();
        let candidate = candidate_from_release(&release(&board, Square::E2, Square::E4));
        assert_eq!(
            candidate,
            Candidate::Ready(ChessMove::new(Square::E2, Square::E4))
        );
    }

    #[test]
    fn test_promotion_required_iff_pawn_reaches_edge_rank() {
        let pawn = Piece {
            color: Color::White,
            role: Role::Pawn,
        };
        let knight = Piece {
            color: Color::White,
            role: Role::Knight,
        };
        assert!(needs_promotion(pawn, Square::E8));
        assert!(needs_promotion(pawn, Square::A1));
        assert!(!needs_promotion(pawn, Square::E7));
        assert!(!needs_promotion(pawn, Square::E2));
        assert!(!needs_promotion(knight, Square::B8));
    }

    #[test]
    fn test_pawn_to_last_rank_needs_promotion() {
        let board = GameBoard::from_fen("7k/4P3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let Candidate::NeedsPromotion(pending) =
            candidate_from_release(&release(&board, Square::E7, Square::E8))
        else {
            panic!("expected a promotion prompt");
        };
        assert_eq!(pending.color, Color::White);
        let mv = validate(&board, pending.complete(Role::Queen)).unwrap();
        assert_eq!(mv.to_uci(), "e7e8q");
    }

    #[test]
    fn test_invalid_move_rejected_without_mutation() {
        let board = GameBoard::new();
        let before = board.clone();
        let bad = ChessMove::new(Square::E2, Square::E5);
        assert_eq!(validate(&board, bad), Err(MoveRejected { attempted: bad }));
        assert_eq!(validate(&board, bad), Err(MoveRejected { attempted: bad }));
        assert_eq!(board, before);
    }

    #[test]
    fn test_promotion_without_piece_is_rejected() {
        let board = GameBoard::from_fen("7k/4P3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(validate(&board, ChessMove::new(Square::E7, Square::E8)).is_err());
    }

    #[test]
    fn test_king_in_check_may_be_ignored() {
        // white is in check from the rook but plays a pawn move anyway
        let board = GameBoard::from_fen("4r1k1/8/8/8/8/8/P7/4K3 w - - 0 1").unwrap();
        assert!(validate(&board, ChessMove::new(Square::A2, Square::A3)).is_ok());
    }
}
