//! FEN parsing and rendering for [`Position`].
//!
//! Only the piece placement and side-to-move fields are modeled. Castling,
//! en passant, and move counter fields are accepted on input and ignored;
//! rendering always emits `- - 0 1` for them.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::error::FenError;
use crate::piece::Piece;
use crate::position::Position;
use crate::square::Square;

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();

        let placement = fields.next().ok_or(FenError::MissingField {
            field: "piece placement",
        })?;
        let side = fields.next().ok_or(FenError::MissingField {
            field: "side to move",
        })?;

        if fields.next().is_some() {
            debug!(fen = s, "ignoring castling/en-passant/clock fields");
        }

        let pieces = parse_placement(placement)?;
        let side_to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidColor {
                    found: other.to_string(),
                });
            }
        };

        let position = Position::from_piece_boards(pieces, side_to_move);
        position.validate()?;
        Ok(position)
    }
}

fn parse_placement(placement: &str) -> Result<[Bitboard; Piece::COUNT], FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }

    let mut pieces = [Bitboard::EMPTY; Piece::COUNT];

    // FEN lists rank 8 first.
    for (row, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(skip) = ch.to_digit(10) {
                if skip == 0 || skip == 9 {
                    return Err(FenError::InvalidPieceChar { character: ch });
                }
                file += skip as u8;
            } else {
                let piece =
                    Piece::from_fen_char(ch).ok_or(FenError::InvalidPieceChar { character: ch })?;
                if file >= 8 {
                    return Err(FenError::BadRankLength {
                        rank_index: rank as usize,
                        length: file as usize + 1,
                    });
                }
                let sq = Square::from_rank_file(rank, file);
                pieces[piece.index()] = pieces[piece.index()].with(sq);
                file += 1;
            }
        }

        if file != 8 {
            return Err(FenError::BadRankLength {
                rank_index: rank as usize,
                length: file as usize,
            });
        }
    }

    Ok(pieces)
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for file in 0..8 {
                match self.piece_on(Square::from_rank_file(rank, file)) {
                    Some(piece) => {
                        if empty_run > 0 {
                            write!(f, "{empty_run}")?;
                            empty_run = 0;
                        }
                        write!(f, "{}", piece.fen_char())?;
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                write!(f, "{empty_run}")?;
            }
            if rank > 0 {
                write!(f, "/")?;
            }
        }

        let side = match self.side_to_move() {
            Color::White => 'w',
            Color::Black => 'b',
        };
        write!(f, " {side} - - 0 1")
    }
}
