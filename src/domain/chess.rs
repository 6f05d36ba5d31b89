//! Pure chess domain types and utilities.
//! No GPUI dependencies - this is the domain layer.

use std::fmt;

use shakmaty::uci::UciMove;
use shakmaty::{Color as SColor, File, Rank, Role, Square};

use crate::domain::movegen::PROMOTION_ROLES;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PieceColor {
    White,
    Black,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: PieceColor,
}

impl Piece {
    pub fn svg_path(&self) -> &'static str {
        match (self.kind, self.color) {
            (PieceKind::Pawn, PieceColor::White) => "assets/pawn-white.svg",
            (PieceKind::Pawn, PieceColor::Black) => "assets/pawn-black.svg",
            (PieceKind::Rook, PieceColor::White) => "assets/rook-white.svg",
            (PieceKind::Rook, PieceColor::Black) => "assets/rook-black.svg",
            (PieceKind::Knight, PieceColor::White) => "assets/knight-white.svg",
            (PieceKind::Knight, PieceColor::Black) => "assets/knight-black.svg",
            (PieceKind::Bishop, PieceColor::White) => "assets/bishop-white.svg",
            (PieceKind::Bishop, PieceColor::Black) => "assets/bishop-black.svg",
            (PieceKind::Queen, PieceColor::White) => "assets/queen-white.svg",
            (PieceKind::Queen, PieceColor::Black) => "assets/queen-black.svg",
            (PieceKind::King, PieceColor::White) => "assets/king-white.svg",
            (PieceKind::King, PieceColor::Black) => "assets/king-black.svg",
        }
    }
}

/// Convert row/col (0-indexed, row 0 = rank 8) to shakmaty Square
pub fn to_square(row: usize, col: usize) -> Square {
    let file = File::new(col as u32);
    let rank = Rank::new(7 - row as u32); // row 0 = rank 8, row 7 = rank 1
    Square::from_coords(file, rank)
}

/// Inverse of [`to_square`]
pub fn to_row_col(sq: Square) -> (usize, usize) {
    let row = 7 - u32::from(sq.rank()) as usize;
    let col = u32::from(sq.file()) as usize;
    (row, col)
}

pub fn color_to_domain(color: SColor) -> PieceColor {
    match color {
        SColor::White => PieceColor::White,
        SColor::Black => PieceColor::Black,
    }
}

pub fn role_to_kind(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

/// Convert shakmaty piece to our domain Piece
pub fn shakmaty_to_piece(piece: shakmaty::Piece) -> Piece {
    Piece {
        kind: role_to_kind(piece.role),
        color: color_to_domain(piece.color),
    }
}

/// A move in coordinate form: origin, destination and an optional promotion.
///
/// Castling is the king's two-square step (`e1g1`), matching what UCI engines
/// send and expect.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

impl ChessMove {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(from: Square, to: Square, role: Role) -> Self {
        Self {
            from,
            to,
            promotion: Some(role),
        }
    }

    /// Parse UCI long algebraic notation (`e2e4`, `e7e8q`). Null moves, drops
    /// and promotions to anything but Q/R/B/N are refused.
    pub fn from_uci(text: &str) -> Option<Self> {
        match text.trim().parse::<UciMove>().ok()? {
            UciMove::Normal { from, to, promotion }
                if promotion.is_none_or(|role| PROMOTION_ROLES.contains(&role)) =>
            {
                Some(Self { from, to, promotion })
            }
            _ => None,
        }
    }

    pub fn to_uci(&self) -> String {
        self.to_uci_move().to_string()
    }

    pub fn to_uci_move(&self) -> UciMove {
        UciMove::Normal {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_uci_move(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_square_orientation() {
        assert_eq!(to_square(0, 0), Square::A8);
        assert_eq!(to_square(7, 0), Square::A1);
        assert_eq!(to_square(6, 4), Square::E2);
        assert_eq!(to_row_col(Square::E2), (6, 4));
        assert_eq!(to_row_col(Square::H8), (0, 7));
    }

    #[test]
    fn test_parse_uci_move() {
        let mv = ChessMove::from_uci("e2e4").unwrap();
        assert_eq!(mv, ChessMove::new(Square::E2, Square::E4));

        let promo = ChessMove::from_uci("e7e8q").unwrap();
        assert_eq!(promo.promotion, Some(Role::Queen));
        assert_eq!(promo.to_uci(), "e7e8q");
    }

    #[test]
    fn test_parse_uci_move_rejects_garbage() {
        assert!(ChessMove::from_uci("(none)").is_none());
        assert!(ChessMove::from_uci("e2").is_none());
        assert!(ChessMove::from_uci("e7e8k").is_none());
        assert!(ChessMove::from_uci("z9e4").is_none());
        assert!(ChessMove::from_uci("0000").is_none());
        assert!(ChessMove::from_uci("N@f3").is_none());
    }
}
