//! Pin- and check-aware legal move generation.
//!
//! [`compute_pin_check_info`] walks the 8 rays out of the side-to-move's king
//! once per position, classifying checkers and pinned pieces in a single
//! pass. Filtering a pseudo-legal move against the resulting [`PinCheckInfo`]
//! is then O(1) per move, replacing the older make-move/in-check/unmake
//! pattern everywhere except the narrow en passant discovered-check case,
//! which still needs a simulated occupancy probe.

use crate::board::{Board, Color, Piece};
use crate::moves::geometry::{DIR_IS_DIAGONAL, DIR_POSITIVE, DIRS, between, ray};
use crate::moves::knight::KNIGHT_ATTACKS;
use crate::moves::magic::MagicTables;
use crate::moves::movegen::generate_pseudo_legal;
use crate::moves::pawn::pawn_attacks;
use crate::moves::square_control::{is_legal_castling, is_square_attacked_with_occ};
use crate::moves::types::{Move, MoveBuffer};
use crate::square::Square;

/// Per-position summary of checks and pins for the side to move.
#[derive(Debug, Clone, Copy)]
pub struct PinCheckInfo {
    /// Number of distinct pieces currently giving check.
    pub checker_count: u32,
    /// Squares a non-king move must land on to resolve check: the checker's
    /// square plus (for a single sliding checker) the squares between it and
    /// the king. `u64::MAX` when not in check, `0` when in double check.
    pub valid_target_mask: u64,
    /// Per-square allowed destination mask for pinned pieces. `u64::MAX`
    /// (unrestricted) for squares holding no pinned piece.
    pub pinned: [u64; 64],
}

#[inline(always)]
fn nearest_blocker(bits: u64, positive: bool) -> u8 {
    if positive {
        bits.trailing_zeros() as u8
    } else {
        63 - bits.leading_zeros() as u8
    }
}

#[inline(always)]
fn is_matching_slider(board: &Board, attacker: Color, sq_bit: u64, diagonal: bool) -> bool {
    if diagonal {
        (board.pieces(Piece::Bishop, attacker) | board.pieces(Piece::Queen, attacker)) & sq_bit
            != 0
    } else {
        (board.pieces(Piece::Rook, attacker) | board.pieces(Piece::Queen, attacker)) & sq_bit != 0
    }
}

/// Computes checkers and pins for `board.side_to_move` in one pass.
pub fn compute_pin_check_info(board: &Board, tables: &MagicTables) -> PinCheckInfo {
    let _ = tables; // sliders are handled via ray-walking, not the magic tables
    let side = board.side_to_move;
    let opponent = side.opposite();
    let king_sq = board.king_square(side).index();
    let occ = board.occupied();

    let mut checker_count = 0u32;
    let mut check_mask = 0u64;

    let pawn_checkers = pawn_attacks(king_sq, side) & board.pieces(Piece::Pawn, opponent);
    checker_count += pawn_checkers.count_ones();
    check_mask |= pawn_checkers;

    let knight_checkers = KNIGHT_ATTACKS[king_sq as usize] & board.pieces(Piece::Knight, opponent);
    checker_count += knight_checkers.count_ones();
    check_mask |= knight_checkers;

    let mut pinned = [u64::MAX; 64];

    for (dir_idx, _) in DIRS.iter().enumerate() {
        let full_ray = ray(king_sq, dir_idx);
        let blockers = full_ray & occ;
        if blockers == 0 {
            continue;
        }
        let positive = DIR_POSITIVE[dir_idx];
        let diagonal = DIR_IS_DIAGONAL[dir_idx];
        let first = nearest_blocker(blockers, positive);
        let first_bit = 1u64 << first;

        if board.occupancy(side) & first_bit != 0 {
            let beyond = ray(first, dir_idx) & occ;
            if beyond == 0 {
                continue;
            }
            let second = nearest_blocker(beyond, positive);
            let second_bit = 1u64 << second;
            if board.occupancy(opponent) & second_bit != 0
                && is_matching_slider(board, opponent, second_bit, diagonal)
            {
                pinned[first as usize] = between(king_sq, second) | second_bit;
            }
        } else if is_matching_slider(board, opponent, first_bit, diagonal) {
            checker_count += 1;
            check_mask |= between(king_sq, first) | first_bit;
        }
    }

    let valid_target_mask = match checker_count {
        0 => u64::MAX,
        1 => check_mask,
        _ => 0,
    };

    PinCheckInfo {
        checker_count,
        valid_target_mask,
        pinned,
    }
}

/// Checks `mv` for legality against precomputed [`PinCheckInfo`].
///
/// `mv` must already be pseudo-legal for `board`.
pub fn is_legal_given_info(
    board: &Board,
    mv: Move,
    tables: &MagicTables,
    info: &PinCheckInfo,
) -> bool {
    let side = board.side_to_move;
    let opponent = side.opposite();
    let king_sq = board.king_square(side).index();

    if mv.piece == Piece::King {
        if mv.is_castling() {
            return is_legal_castling(board, mv, tables);
        }
        let occ_without_king = board.occupied() & !(1u64 << king_sq);
        return !is_square_attacked_with_occ(board, mv.to, opponent, tables, occ_without_king);
    }

    if mv.is_en_passant() {
        let capture_idx = if side == Color::White {
            mv.to.index() - 8
        } else {
            mv.to.index() + 8
        };

        if info.valid_target_mask & (1u64 << capture_idx) == 0 {
            return false;
        }

        let pinned_mask = info.pinned[mv.from.index() as usize];
        if pinned_mask != u64::MAX && pinned_mask & (1u64 << mv.to.index()) == 0 {
            return false;
        }

        // Horizontal discovered check: removing both pawns from the rank can
        // expose the king to a rook/queen even though neither pawn alone is
        // pinned. Not caught by the ray walk above, which only ever removes
        // one blocker at a time.
        let mut occ = board.occupied();
        occ &= !(1u64 << mv.from.index());
        occ &= !(1u64 << capture_idx);
        occ |= 1u64 << mv.to.index();
        return !is_square_attacked_with_occ(
            board,
            Square::from_index(king_sq),
            opponent,
            tables,
            occ,
        );
    }

    if info.valid_target_mask & (1u64 << mv.to.index()) == 0 {
        return false;
    }

    let pinned_mask = info.pinned[mv.from.index() as usize];
    pinned_mask == u64::MAX || pinned_mask & (1u64 << mv.to.index()) != 0
}

/// Checks a single pseudo-legal move for legality, computing its own
/// [`PinCheckInfo`]. Prefer [`is_legal_given_info`] when checking several
/// moves in the same position.
pub fn is_legal_move(board: &Board, mv: Move, tables: &MagicTables) -> bool {
    let info = compute_pin_check_info(board, tables);
    is_legal_given_info(board, mv, tables, &info)
}

/// Generates every legal move for the side to move.
pub fn generate_legal(
    board: &Board,
    tables: &MagicTables,
    moves: &mut impl MoveBuffer,
    scratch: &mut impl MoveBuffer,
) {
    scratch.clear();
    generate_pseudo_legal(board, tables, scratch);
    moves.clear();

    let info = compute_pin_check_info(board, tables);
    for mv in scratch.iter().copied() {
        if is_legal_given_info(board, mv, tables, &info) {
            moves.push(mv);
        }
    }
}

/// Generates legal captures and promotions for the side to move.
pub fn generate_captures(
    board: &Board,
    tables: &MagicTables,
    moves: &mut impl MoveBuffer,
    scratch: &mut impl MoveBuffer,
) {
    scratch.clear();
    generate_pseudo_legal(board, tables, scratch);
    moves.clear();

    let info = compute_pin_check_info(board, tables);
    for mv in scratch.iter().copied() {
        if !mv.is_capture() && !mv.is_promotion() {
            continue;
        }
        if is_legal_given_info(board, mv, tables, &info) {
            moves.push(mv);
        }
    }
}
