//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use super::castle_bits::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use super::fen_tables::{CHAR_TO_PC, PC_TO_CHAR};
use super::{Board, Color, EMPTY_SQ, Piece};
use crate::square::Square;

impl Board {
    /// Resets `self` to the position described by `fen` (the standard
    /// six-field FEN string).
    pub fn set_fen(&mut self, fen: &str) -> Result<(), String> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(format!("FEN has too few fields: {:?}", fen));
        }

        *self = Board::new_empty();

        parse_placement(self, fields[0])?;

        self.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(format!("invalid side to move: {:?}", other)),
        };

        self.castling_rights = 0;
        if fields[2] != "-" {
            for c in fields[2].chars() {
                self.castling_rights |= match c {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    other => return Err(format!("invalid castling right: {:?}", other)),
                };
            }
        }

        self.en_passant = if fields[3] == "-" {
            None
        } else {
            Some(
                fields[3]
                    .parse::<Square>()
                    .map_err(|e| format!("invalid en passant square {:?}: {e}", fields[3]))?,
            )
        };

        self.halfmove_clock = fields.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
        self.fullmove_number = fields.get(5).and_then(|s| s.parse().ok()).unwrap_or(1);

        self.refresh_zobrist();
        self.history.clear();
        Ok(())
    }

    /// Renders `self` as a standard six-field FEN string.
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8).rev() {
            let mut empty_run = 0u8;
            for file in 0..8 {
                let sq = Square::new(rank, file).index() as usize;
                match self.piece_at_raw(sq) {
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            placement.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        placement.push(PC_TO_CHAR[pc_index(piece, color)]);
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                placement.push_str(&empty_run.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };

        let mut castling = String::new();
        if self.castling_rights & CASTLE_WK != 0 {
            castling.push('K');
        }
        if self.castling_rights & CASTLE_WQ != 0 {
            castling.push('Q');
        }
        if self.castling_rights & CASTLE_BK != 0 {
            castling.push('k');
        }
        if self.castling_rights & CASTLE_BQ != 0 {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = self
            .en_passant
            .map(|sq| sq.to_string())
            .unwrap_or_else(|| "-".to_string());

        format!(
            "{} {} {} {} {} {}",
            placement, side, castling, ep, self.halfmove_clock, self.fullmove_number
        )
    }

    #[inline]
    fn piece_at_raw(&self, sq: usize) -> Option<(Color, Piece)> {
        let val = self.piece_on_sq[sq];
        if val == EMPTY_SQ {
            None
        } else {
            Some((Color::from_u8((val >> 3) & 1), Piece::from_u8(val & 0b111)))
        }
    }
}

#[inline]
const fn pc_index(piece: Piece, color: Color) -> usize {
    (color as usize) * 6 + (piece as usize)
}

fn parse_placement(board: &mut Board, placement: &str) -> Result<(), String> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(format!(
            "FEN placement must have 8 ranks, got {}",
            ranks.len()
        ));
    }

    for (rank_from_top, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_from_top as u8;
        let mut file = 0u8;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as u8;
                continue;
            }
            if file >= 8 {
                return Err(format!("rank {:?} overflows 8 files", rank_str));
            }
            let (piece, color) = CHAR_TO_PC[c as usize]
                .ok_or_else(|| format!("invalid FEN piece glyph: {:?}", c))?;
            let sq = Square::new(rank, file);
            let bb = board.pieces(piece, color) | (1u64 << sq.index());
            board.set_bb(color, piece, bb);
            file += 1;
        }
        if file != 8 {
            return Err(format!("rank {:?} does not cover 8 files", rank_str));
        }
    }

    Ok(())
}
