//! Chess move representation, bit-packed into a u16.

use std::fmt;

use crate::piece_kind::PieceKind;
use crate::square::Square;

// Private bit-field constants.
const SRC_MASK: u16 = 0x003F;
const DST_MASK: u16 = 0x0FC0;
const PROMO_MASK: u16 = 0x3000;
const PROMO_FLAG: u16 = 0x4000;
const DST_SHIFT: u32 = 6;
const PROMO_SHIFT: u32 = 12;

/// The piece a pawn promotes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PromotionPiece {
    Knight = 0,
    Bishop = 1,
    Rook = 2,
    Queen = 3,
}

impl PromotionPiece {
    /// All promotion pieces in index order.
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Knight,
        PromotionPiece::Bishop,
        PromotionPiece::Rook,
        PromotionPiece::Queen,
    ];

    /// Convert to the corresponding [`PieceKind`].
    pub const fn to_piece_kind(self) -> PieceKind {
        match self {
            PromotionPiece::Knight => PieceKind::Knight,
            PromotionPiece::Bishop => PieceKind::Bishop,
            PromotionPiece::Rook => PieceKind::Rook,
            PromotionPiece::Queen => PieceKind::Queen,
        }
    }

    /// Return the UCI character for this promotion.
    pub const fn uci_char(self) -> char {
        match self {
            PromotionPiece::Knight => 'n',
            PromotionPiece::Bishop => 'b',
            PromotionPiece::Rook => 'r',
            PromotionPiece::Queen => 'q',
        }
    }

    /// Parse a UCI promotion character.
    pub const fn from_uci_char(c: char) -> Option<PromotionPiece> {
        match c {
            'n' => Some(PromotionPiece::Knight),
            'b' => Some(PromotionPiece::Bishop),
            'r' => Some(PromotionPiece::Rook),
            'q' => Some(PromotionPiece::Queen),
            _ => None,
        }
    }

    /// Return the bit pattern for this promotion, shifted to position.
    const fn bits(self) -> u16 {
        (self as u16) << PROMO_SHIFT
    }
}

/// A chess move encoded in 16 bits.
///
/// ```text
/// bits  0-5:  source square      (0-63)
/// bits  6-11: destination square (0-63)
/// bits 12-13: promotion piece    (Knight=0, Bishop=1, Rook=2, Queen=3)
/// bit  14:    promotion flag
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// Null move sentinel (A1→A1, no promotion). Never a legal move;
    /// printed as "0000".
    pub const NULL: Move = Move(0);

    /// Create a normal (quiet or capture) move.
    pub const fn new(source: Square, dest: Square) -> Move {
        Move((source.index() as u16) | ((dest.index() as u16) << DST_SHIFT))
    }

    /// Create a promotion move.
    pub const fn new_promotion(source: Square, dest: Square, promo: PromotionPiece) -> Move {
        Move(
            (source.index() as u16)
                | ((dest.index() as u16) << DST_SHIFT)
                | promo.bits()
                | PROMO_FLAG,
        )
    }

    /// Extract the source square.
    pub const fn source(self) -> Square {
        Square::from_index_unchecked((self.0 & SRC_MASK) as u8)
    }

    /// Extract the destination square.
    pub const fn dest(self) -> Square {
        Square::from_index_unchecked(((self.0 & DST_MASK) >> DST_SHIFT) as u8)
    }

    /// Return the promotion piece, or `None` for a non-promotion move.
    pub const fn promotion(self) -> Option<PromotionPiece> {
        if self.0 & PROMO_FLAG == 0 {
            return None;
        }
        Some(match (self.0 & PROMO_MASK) >> PROMO_SHIFT {
            0 => PromotionPiece::Knight,
            1 => PromotionPiece::Bishop,
            2 => PromotionPiece::Rook,
            _ => PromotionPiece::Queen,
        })
    }

    /// Return `true` if this is the null move sentinel.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Return `true` if this is a promotion move.
    pub const fn is_promotion(self) -> bool {
        self.0 & PROMO_FLAG != 0
    }

    /// Parse 4-5 character coordinate notation ("e2e4", "e7e8q").
    ///
    /// Returns `None` for short or malformed text, including a fifth
    /// character outside {n, b, r, q}.
    pub fn from_uci(s: &str) -> Option<Move> {
        if !s.is_ascii() || (s.len() != 4 && s.len() != 5) {
            return None;
        }

        let source = Square::from_algebraic(&s[0..2])?;
        let dest = Square::from_algebraic(&s[2..4])?;

        if s.len() == 5 {
            let promo_char = s.chars().nth(4)?;
            let promo = PromotionPiece::from_uci_char(promo_char)?;
            Some(Move::new_promotion(source, dest, promo))
        } else {
            Some(Move::new(source, dest))
        }
    }

    /// Return the UCI string representation: 4 characters plus an optional
    /// promotion letter, or "0000" for the null move.
    pub fn to_uci(self) -> String {
        format!("{self}")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "0000")
        } else if let Some(promo) = self.promotion() {
            write!(f, "{}{}{}", self.source(), self.dest(), promo.uci_char())
        } else {
            write!(f, "{}{}", self.source(), self.dest())
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self)
    }
}
