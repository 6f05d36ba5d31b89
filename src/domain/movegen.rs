//! Pseudo-legal move generation.
//!
//! Moves respect piece geometry and whose turn it is, nothing more: a side may
//! leave its king attacked, and the enemy king is an ordinary capture target.
//! Castling still requires that the king does not start on, pass through or
//! land on an attacked square.

use shakmaty::{Bitboard, Board, Color, File, Rank, Role, Square, attacks};

use crate::domain::board::GameBoard;
use crate::domain::chess::ChessMove;

/// Promotion choices in the order they are generated (and offered)
pub const PROMOTION_ROLES: [Role; 4] = [Role::Queen, Role::Rook, Role::Bishop, Role::Knight];

pub fn pseudo_legal_moves(pos: &GameBoard) -> Vec<ChessMove> {
    let board = pos.board();
    let us = pos.turn();
    let ours = board.by_color(us);
    let occupied = board.occupied();
    let mut moves = Vec::with_capacity(64);

    gen_pawn_moves(board, us, pos.ep_square(), &mut moves);

    for from in board.knights() & ours {
        push_targets(from, attacks::knight_attacks(from) & !ours, &mut moves);
    }
    for from in board.bishops() & ours {
        push_targets(from, attacks::bishop_attacks(from, occupied) & !ours, &mut moves);
    }
    for from in board.rooks() & ours {
        push_targets(from, attacks::rook_attacks(from, occupied) & !ours, &mut moves);
    }
    for from in board.queens() & ours {
        push_targets(from, attacks::queen_attacks(from, occupied) & !ours, &mut moves);
    }
    for from in board.kings() & ours {
        push_targets(from, attacks::king_attacks(from) & !ours, &mut moves);
    }

    gen_castling(pos, us, &mut moves);

    moves
}

/// Whether any piece of `by` attacks `sq`
pub fn is_attacked(board: &Board, sq: Square, by: Color) -> bool {
    let occupied = board.occupied();
    let attackers = board.by_color(by);
    let diagonal = board.bishops() | board.queens();
    let straight = board.rooks() | board.queens();

    (attacks::knight_attacks(sq) & board.knights() & attackers).any()
        || (attacks::king_attacks(sq) & board.kings() & attackers).any()
        || (attacks::pawn_attacks(!by, sq) & board.pawns() & attackers).any()
        || (attacks::bishop_attacks(sq, occupied) & diagonal & attackers).any()
        || (attacks::rook_attacks(sq, occupied) & straight & attackers).any()
}

fn push_targets(from: Square, targets: Bitboard, moves: &mut Vec<ChessMove>) {
    for to in targets {
        moves.push(ChessMove::new(from, to));
    }
}

fn gen_pawn_moves(board: &Board, us: Color, ep_square: Option<Square>, moves: &mut Vec<ChessMove>) {
    let (step, start_rank, last_rank) = match us {
        Color::White => (8, Rank::Second, Rank::Eighth),
        Color::Black => (-8, Rank::Seventh, Rank::First),
    };
    let occupied = board.occupied();
    let theirs = board.by_color(!us);

    for from in board.pawns() & board.by_color(us) {
        if let Some(one) = from.offset(step) {
            if !occupied.contains(one) {
                push_pawn_move(from, one, last_rank, moves);
                if from.rank() == start_rank {
                    if let Some(two) = one.offset(step) {
                        if !occupied.contains(two) {
                            moves.push(ChessMove::new(from, two));
                        }
                    }
                }
            }
        }

        let captures = attacks::pawn_attacks(us, from);
        for to in captures & theirs {
            push_pawn_move(from, to, last_rank, moves);
        }
        if let Some(ep) = ep_square {
            if captures.contains(ep) && !occupied.contains(ep) {
                moves.push(ChessMove::new(from, ep));
            }
        }
    }
}

fn push_pawn_move(from: Square, to: Square, last_rank: Rank, moves: &mut Vec<ChessMove>) {
    if to.rank() == last_rank {
        for role in PROMOTION_ROLES {
            moves.push(ChessMove::with_promotion(from, to, role));
        }
    } else {
        moves.push(ChessMove::new(from, to));
    }
}

fn gen_castling(pos: &GameBoard, us: Color, moves: &mut Vec<ChessMove>) {
    let board = pos.board();
    let rank = match us {
        Color::White => Rank::First,
        Color::Black => Rank::Eighth,
    };
    let at = |file: File| Square::from_coords(file, rank);
    let king_from = at(File::E);

    let has_king = board
        .piece_at(king_from)
        .is_some_and(|p| p.color == us && p.role == Role::King);
    if !has_king || is_attacked(board, king_from, !us) {
        return;
    }

    // (rook file, squares that must be empty, squares the king crosses)
    let sides: [(File, &[File], [File; 2]); 2] = [
        (File::H, &[File::F, File::G], [File::F, File::G]),
        (File::A, &[File::B, File::C, File::D], [File::D, File::C]),
    ];

    for (rook_file, between, path) in sides {
        if !pos.castling_rights().contains(at(rook_file)) {
            continue;
        }
        let has_rook = board
            .piece_at(at(rook_file))
            .is_some_and(|p| p.color == us && p.role == Role::Rook);
        if !has_rook {
            continue;
        }
        if between.iter().any(|&f| board.piece_at(at(f)).is_some()) {
            continue;
        }
        if path.iter().any(|&f| is_attacked(board, at(f), !us)) {
            continue;
        }
        moves.push(ChessMove::new(king_from, at(path[1])));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moves_of(fen: &str) -> Vec<ChessMove> {
        GameBoard::from_fen(fen).unwrap().pseudo_legal_moves()
    }

    fn has(moves: &[ChessMove], uci: &str) -> bool {
        let mv = ChessMove::from_uci(uci).unwrap();
        moves.contains(&mv)
    }

    #[test]
    fn test_initial_move_count() {
        let moves = GameBoard::new().pseudo_legal_moves();
        assert_eq!(moves.len(), 20);
        assert!(has(&moves, "e2e4"));
        assert!(has(&moves, "g1f3"));
        assert!(!has(&moves, "e7e5"));
    }

    #[test]
    fn test_black_to_move_generates_black_moves() {
        let mut board = GameBoard::new();
        board.play(&ChessMove::new(Square::E2, Square::E4));
        let moves = board.pseudo_legal_moves();
        assert_eq!(moves.len(), 20);
        assert!(has(&moves, "e7e5"));
        assert!(!has(&moves, "d2d4"));
    }

    #[test]
    fn test_moving_into_check_is_allowed() {
        // white king may step next to the black rook's file
        let moves = moves_of("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1");
        assert!(has(&moves, "e1d1"));
        assert!(has(&moves, "e1f2"));
    }

    #[test]
    fn test_king_capture_is_generated() {
        let moves = moves_of("4k3/8/8/8/8/8/8/R3K2R w - - 0 1");
        assert!(!has(&moves, "a1e8"));
        let moves = moves_of("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1");
        assert!(has(&moves, "e1e8"));
    }

    #[test]
    fn test_pinned_piece_still_moves() {
        // bishop on e2 is pinned by the rook on e8 but may leave the file
        let moves = moves_of("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1");
        assert!(has(&moves, "e2d3"));
    }

    #[test]
    fn test_promotion_expands_to_four_roles() {
        let moves = moves_of("7k/4P3/8/8/8/8/8/4K3 w - - 0 1");
        for uci in ["e7e8q", "e7e8r", "e7e8b", "e7e8n"] {
            assert!(has(&moves, uci), "missing {uci}");
        }
        assert!(!has(&moves, "e7e8"));
    }

    #[test]
    fn test_en_passant() {
        let moves = moves_of("4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 2");
        assert!(has(&moves, "d5e6"));
        assert!(has(&moves, "d5d6"));
    }

    #[test]
    fn test_blocked_pawn() {
        let moves = moves_of("4k3/8/8/8/8/4p3/4P3/4K3 w - - 0 1");
        assert!(!has(&moves, "e2e3"));
        assert!(!has(&moves, "e2e4"));
    }

    #[test]
    fn test_castling_both_sides() {
        let moves = moves_of("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert!(has(&moves, "e1g1"));
        assert!(has(&moves, "e1c1"));
    }

    #[test]
    fn test_castling_through_attack_is_not_generated() {
        // black rook on f8 covers f1
        let moves = moves_of("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!has(&moves, "e1g1"));
        assert!(has(&moves, "e1c1"));
    }

    #[test]
    fn test_castling_needs_empty_path_and_rights() {
        let moves = moves_of("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1");
        assert!(!has(&moves, "e1g1"));
        assert!(!has(&moves, "e1c1"));
        let moves = moves_of("4k3/8/8/8/8/8/8/R3K2R w - - 0 1");
        assert!(!has(&moves, "e1g1"));
    }

    #[test]
    fn test_is_attacked() {
        let board = GameBoard::from_fen("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1").unwrap();
        assert!(is_attacked(board.board(), Square::E1, Color::Black));
        assert!(is_attacked(board.board(), Square::C1, Color::Black));
        assert!(!is_attacked(board.board(), Square::D1, Color::Black));
    }
}
