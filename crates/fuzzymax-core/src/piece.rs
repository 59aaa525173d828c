//! Colored chess pieces — the index type for the twelve piece bitboards.

use std::fmt;

use crate::color::Color;
use crate::piece_kind::PieceKind;

/// A piece kind together with its color.
///
/// `index()` runs 0..11: White P, N, B, R, Q, K then Black P, N, B, R, Q, K.
/// This ordering keys both [`Position`](crate::Position)'s piece bitboards
/// and the Zobrist key table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
}

impl Piece {
    /// Total number of colored pieces.
    pub const COUNT: usize = 12;

    /// All pieces in index order.
    pub const ALL: [Piece; 12] = [
        Piece::new(Color::White, PieceKind::Pawn),
        Piece::new(Color::White, PieceKind::Knight),
        Piece::new(Color::White, PieceKind::Bishop),
        Piece::new(Color::White, PieceKind::Rook),
        Piece::new(Color::White, PieceKind::Queen),
        Piece::new(Color::White, PieceKind::King),
        Piece::new(Color::Black, PieceKind::Pawn),
        Piece::new(Color::Black, PieceKind::Knight),
        Piece::new(Color::Black, PieceKind::Bishop),
        Piece::new(Color::Black, PieceKind::Rook),
        Piece::new(Color::Black, PieceKind::Queen),
        Piece::new(Color::Black, PieceKind::King),
    ];

    /// Create a piece from a color and kind.
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Piece {
        Piece { color, kind }
    }

    /// Return the color.
    #[inline]
    pub const fn color(self) -> Color {
        self.color
    }

    /// Return the kind.
    #[inline]
    pub const fn kind(self) -> PieceKind {
        self.kind
    }

    /// Return the index (0..11): `color * 6 + kind`.
    #[inline]
    pub const fn index(self) -> usize {
        self.color.index() * PieceKind::COUNT + self.kind.index()
    }

    /// Parse a FEN character: uppercase = White, lowercase = Black.
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_fen_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(color, kind))
    }

    /// Return the FEN character: uppercase for White, lowercase for Black.
    #[inline]
    pub const fn fen_char(self) -> char {
        let c = self.kind.fen_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_char())
    }
}

#[cfg(test)]
mod tests {
    use super::Piece;
    use crate::color::Color;
    use crate::piece_kind::PieceKind;

    #[test]
    fn index_order_matches_all() {
        for (i, piece) in Piece::ALL.iter().enumerate() {
            assert_eq!(piece.index(), i);
        }
    }

    #[test]
    fn index_layout() {
        assert_eq!(Piece::new(Color::White, PieceKind::Pawn).index(), 0);
        assert_eq!(Piece::new(Color::White, PieceKind::King).index(), 5);
        assert_eq!(Piece::new(Color::Black, PieceKind::Pawn).index(), 6);
        assert_eq!(Piece::new(Color::Black, PieceKind::King).index(), 11);
    }

    #[test]
    fn fen_char_roundtrip() {
        for piece in Piece::ALL {
            assert_eq!(Piece::from_fen_char(piece.fen_char()), Some(piece));
        }
    }

    #[test]
    fn fen_char_case() {
        assert_eq!(Piece::new(Color::White, PieceKind::Queen).fen_char(), 'Q');
        assert_eq!(Piece::new(Color::Black, PieceKind::Queen).fen_char(), 'q');
        assert_eq!(Piece::from_fen_char('N'), Some(Piece::new(Color::White, PieceKind::Knight)));
        assert_eq!(Piece::from_fen_char('n'), Some(Piece::new(Color::Black, PieceKind::Knight)));
        assert_eq!(Piece::from_fen_char('x'), None);
    }
}
