//! Static position evaluation: material plus piece-square tables, with the
//! king table tapered between midgame and endgame by remaining material.
//!
//! A pure function of the position — no caching, no search-dependent state.

use crate::board::{Board, Color, Piece};
use crate::moves::magic::MagicTables;
use crate::search::pesto;

const PAWN_VALUE: i32 = 100;
const KNIGHT_VALUE: i32 = 350;
const BISHOP_VALUE: i32 = 350;
const ROOK_VALUE: i32 = 525;
const QUEEN_VALUE: i32 = 1000;

const KNIGHT_PHASE: i32 = 1;
const BISHOP_PHASE: i32 = 1;
const ROOK_PHASE: i32 = 2;
const QUEEN_PHASE: i32 = 4;
const TOTAL_PHASE: i32 = 4 * KNIGHT_PHASE + 4 * BISHOP_PHASE + 4 * ROOK_PHASE + 2 * QUEEN_PHASE;

#[inline(always)]
fn material_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => 0,
    }
}

#[inline(always)]
fn psqt_table(piece: Piece) -> &'static [i32; 64] {
    match piece {
        Piece::Pawn => &pesto::PAWN_TABLE,
        Piece::Knight => &pesto::KNIGHT_TABLE,
        Piece::Bishop => &pesto::BISHOP_TABLE,
        Piece::Rook => &pesto::ROOK_TABLE,
        Piece::Queen => &pesto::QUEEN_TABLE,
        Piece::King => unreachable!("king uses the tapered table, not psqt_table"),
    }
}

#[inline(always)]
pub fn mirror_vert(sq: u8) -> usize {
    (sq ^ 56) as usize
}

/// Non-pawn material remaining on the board, clamped to `[0, TOTAL_PHASE]`.
fn phase_material(board: &Board) -> i32 {
    let count = |piece: Piece| {
        (board.pieces(piece, Color::White) | board.pieces(piece, Color::Black)).count_ones() as i32
    };
    let material = count(Piece::Knight) * KNIGHT_PHASE
        + count(Piece::Bishop) * BISHOP_PHASE
        + count(Piece::Rook) * ROOK_PHASE
        + count(Piece::Queen) * QUEEN_PHASE;
    material.clamp(0, TOTAL_PHASE)
}

/// `0.0` at full midgame material, `1.0` once non-pawn material is gone.
pub fn game_phase(board: &Board) -> f32 {
    1.0 - (phase_material(board) as f32 / TOTAL_PHASE as f32)
}

fn king_psqt_value(color: Color, sq: u8, phase: f32) -> i32 {
    let idx = match color {
        Color::White => sq as usize,
        Color::Black => mirror_vert(sq),
    };
    let mg = pesto::KING_MIDGAME_TABLE[idx] as f32;
    let eg = pesto::KING_ENDGAME_TABLE[idx] as f32;
    (mg * (1.0 - phase) + eg * phase).round() as i32
}

fn psqt_value(piece: Piece, color: Color, sq: u8, phase: f32) -> i32 {
    if piece == Piece::King {
        return king_psqt_value(color, sq, phase);
    }
    let idx = match color {
        Color::White => sq as usize,
        Color::Black => mirror_vert(sq),
    };
    psqt_table(piece)[idx]
}

fn side_score(board: &Board, color: Color, phase: f32) -> i32 {
    const PIECES: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    let mut score = 0;
    for piece in PIECES {
        let mut bb = board.pieces(piece, color);
        let count = bb.count_ones() as i32;
        score += count * material_value(piece);
        while bb != 0 {
            let sq = bb.trailing_zeros() as u8;
            bb &= bb - 1;
            score += psqt_value(piece, color, sq, phase);
        }
    }
    score
}

/// Raw material balance (white minus black), in centipawns, independent of
/// side to move.
pub fn eval_material(board: &Board) -> i32 {
    let count = |piece: Piece, color: Color| board.pieces(piece, color).count_ones() as i32;
    [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
    ]
    .into_iter()
    .map(|piece| (count(piece, Color::White) - count(piece, Color::Black)) * material_value(piece))
    .sum()
}

/// Evaluates `board` from the side-to-move's perspective, in centipawns.
///
/// `tables` is accepted for API stability with callers that pass it
/// alongside search state; the evaluator itself needs no slider attacks.
pub fn static_eval(board: &Board, _tables: &MagicTables, _alpha: i32, _beta: i32) -> i32 {
    let phase = game_phase(board);
    let white = side_score(board, Color::White, phase);
    let black = side_score(board, Color::Black, phase);
    let score = white - black;

    match board.side_to_move {
        Color::White => score,
        Color::Black => -score,
    }
}
