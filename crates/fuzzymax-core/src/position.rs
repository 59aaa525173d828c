//! The chess position: twelve piece bitboards, derived occupancy, side to move.

use std::fmt;

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::chess_move::Move;
use crate::color::Color;
use crate::error::PositionError;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;
use crate::zobrist;

/// Complete position state.
///
/// A value type: [`make_move`](Position::make_move) returns a new position and
/// never mutates in place, so every search branch owns its own copy. The side
/// and occupancy unions are derived caches, recomputed after every move; the
/// twelve piece bitboards are the authoritative state.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Bitboard per colored piece, indexed by [`Piece::index()`].
    pieces: [Bitboard; Piece::COUNT],
    /// Union of each side's piece bitboards, indexed by [`Color::index()`].
    sides: [Bitboard; Color::COUNT],
    /// Union of both sides.
    occupied: Bitboard,
    /// Which side moves next.
    side_to_move: Color,
}

impl Position {
    /// Return the standard starting position, White to move.
    pub fn starting() -> Position {
        Position::from_piece_boards(
            [
                Bitboard::new(0x0000_0000_0000_FF00), // white pawns
                Bitboard::new(0x0000_0000_0000_0042), // white knights
                Bitboard::new(0x0000_0000_0000_0024), // white bishops
                Bitboard::new(0x0000_0000_0000_0081), // white rooks
                Bitboard::new(0x0000_0000_0000_0008), // white queen
                Bitboard::new(0x0000_0000_0000_0010), // white king
                Bitboard::new(0x00FF_0000_0000_0000), // black pawns
                Bitboard::new(0x4200_0000_0000_0000), // black knights
                Bitboard::new(0x2400_0000_0000_0000), // black bishops
                Bitboard::new(0x8100_0000_0000_0000), // black rooks
                Bitboard::new(0x0800_0000_0000_0000), // black queen
                Bitboard::new(0x1000_0000_0000_0000), // black king
            ],
            Color::White,
        )
    }

    /// Construct a position from piece bitboards, deriving the occupancy
    /// unions. Used by FEN parsing and the starting-position constructor.
    pub(crate) fn from_piece_boards(
        pieces: [Bitboard; Piece::COUNT],
        side_to_move: Color,
    ) -> Position {
        let mut pos = Position {
            pieces,
            sides: [Bitboard::EMPTY; Color::COUNT],
            occupied: Bitboard::EMPTY,
            side_to_move,
        };
        pos.recompute_occupancy();
        pos
    }

    /// Rebuild the side and occupancy unions from the piece bitboards.
    fn recompute_occupancy(&mut self) {
        let mut sides = [Bitboard::EMPTY; Color::COUNT];
        for piece in Piece::ALL {
            sides[piece.color().index()] |= self.pieces[piece.index()];
        }
        self.sides = sides;
        self.occupied = sides[Color::White.index()] | sides[Color::Black.index()];
    }

    /// Return the bitboard for the given colored piece.
    #[inline]
    pub fn pieces(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    /// Return the bitboard for the given side.
    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.sides[color.index()]
    }

    /// Return the occupied squares bitboard.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Return the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Return the colored piece on the given square, if any.
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        Piece::ALL
            .into_iter()
            .find(|&piece| self.pieces[piece.index()].contains(sq))
    }

    /// Return the square of the given side's king, or `None` if the king is
    /// absent. A kingless side is tolerated rather than rejected; such
    /// positions simply never report check.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces[Piece::new(color, PieceKind::King).index()].lsb()
    }

    /// Return `true` if `sq` is attacked by any piece of `by_color`.
    ///
    /// Leaper patterns are cast from the target square and intersected with
    /// the attacker's pieces; sliding rays walk outward until the first
    /// occupied square, which counts only if it holds an enemy slider of the
    /// matching type.
    pub fn is_square_attacked(&self, sq: Square, by_color: Color) -> bool {
        let pawn = self.pieces[Piece::new(by_color, PieceKind::Pawn).index()];
        // A pawn of `by_color` on X attacks `sq` iff a pawn of the opposite
        // color on `sq` would attack X.
        if (pawn_attacks(by_color.flip(), sq) & pawn).is_nonempty() {
            return true;
        }

        let knight = self.pieces[Piece::new(by_color, PieceKind::Knight).index()];
        if (knight_attacks(sq) & knight).is_nonempty() {
            return true;
        }

        let king = self.pieces[Piece::new(by_color, PieceKind::King).index()];
        if (king_attacks(sq) & king).is_nonempty() {
            return true;
        }

        let bishop_queen = self.pieces[Piece::new(by_color, PieceKind::Bishop).index()]
            | self.pieces[Piece::new(by_color, PieceKind::Queen).index()];
        if (bishop_attacks(sq, self.occupied) & bishop_queen).is_nonempty() {
            return true;
        }

        let rook_queen = self.pieces[Piece::new(by_color, PieceKind::Rook).index()]
            | self.pieces[Piece::new(by_color, PieceKind::Queen).index()];
        if (rook_attacks(sq, self.occupied) & rook_queen).is_nonempty() {
            return true;
        }

        false
    }

    /// Return `true` if the given side's king is attacked by the other side.
    pub fn king_attacked(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(sq) => self.is_square_attacked(sq, color.flip()),
            None => false,
        }
    }

    /// Return `true` if the side to move is in check.
    #[inline]
    pub fn in_check(&self) -> bool {
        self.king_attacked(self.side_to_move)
    }

    /// Return `true` if the side to move is checkmated.
    pub fn is_checkmate(&self) -> bool {
        self.in_check() && self.legal_moves().is_empty()
    }

    /// Return `true` if the side to move is stalemated.
    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && self.legal_moves().is_empty()
    }

    /// Apply a move and return the resulting position. Copy-make: `self` is
    /// not modified.
    ///
    /// If the source square holds no piece of the side to move, the position
    /// is returned unchanged. That is a defensive fallback, not a legality
    /// check; callers must only pass moves drawn from
    /// [`legal_moves`](Position::legal_moves).
    pub fn make_move(&self, mv: Move) -> Position {
        let mut next = *self;
        let us = self.side_to_move;
        let them = us.flip();
        let src = mv.source();
        let dst = mv.dest();

        let mover = match self.piece_on(src) {
            Some(piece) if piece.color() == us => piece,
            _ => return next,
        };

        next.pieces[mover.index()] = next.pieces[mover.index()].without(src);

        // Capture: clear any enemy piece on the destination.
        for kind in PieceKind::ALL {
            let victim = Piece::new(them, kind);
            if next.pieces[victim.index()].contains(dst) {
                next.pieces[victim.index()] = next.pieces[victim.index()].without(dst);
                break;
            }
        }

        let landed = match mv.promotion() {
            Some(promo) => Piece::new(us, promo.to_piece_kind()),
            None => mover,
        };
        next.pieces[landed.index()] = next.pieces[landed.index()].with(dst);

        next.recompute_occupancy();
        next.side_to_move = them;
        next
    }

    /// Return the Zobrist hash of this position.
    ///
    /// Depends only on (piece, square) pairs and the side to move, so two
    /// positions with identical placement hash identically regardless of the
    /// move order that produced them.
    pub fn hash(&self) -> u64 {
        zobrist::hash_position(self)
    }

    /// Conservative cannot-force-mate test.
    ///
    /// True iff neither side retains any pawn, rook, or queen, and neither
    /// side has knight+bishop, two opposite-colored bishops, or three or
    /// more knights.
    pub fn is_insufficient_material(&self) -> bool {
        for color in Color::ALL {
            for kind in [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen] {
                if self.pieces[Piece::new(color, kind).index()].is_nonempty() {
                    return false;
                }
            }
        }

        !self.has_mating_material(Color::White) && !self.has_mating_material(Color::Black)
    }

    /// Minor-piece mating material: knight+bishop, opposite-colored bishop
    /// pair, or three knights.
    fn has_mating_material(&self, color: Color) -> bool {
        let knights = self.pieces[Piece::new(color, PieceKind::Knight).index()].count();
        let bishops = self.pieces[Piece::new(color, PieceKind::Bishop).index()];

        if knights >= 1 && bishops.is_nonempty() {
            return true;
        }
        if bishops.count() >= 2 && bishops_on_both_colors(bishops) {
            return true;
        }
        knights >= 3
    }

    /// Validate the structural invariants of the position.
    pub fn validate(&self) -> Result<(), PositionError> {
        // No square claimed by two piece bitboards.
        for i in 0..Piece::COUNT {
            for j in (i + 1)..Piece::COUNT {
                if (self.pieces[i] & self.pieces[j]).is_nonempty() {
                    return Err(PositionError::OverlappingPieces);
                }
            }
        }

        // Occupancy unions must match the piece bitboards exactly.
        let mut sides = [Bitboard::EMPTY; Color::COUNT];
        for piece in Piece::ALL {
            sides[piece.color().index()] |= self.pieces[piece.index()];
        }
        if sides != self.sides || self.occupied != (sides[0] | sides[1]) {
            return Err(PositionError::InconsistentOccupancy);
        }

        // At most one king per side. A missing king is tolerated (the check
        // detector simply reports no check), but two kings never are.
        for color in Color::ALL {
            let count = self.pieces[Piece::new(color, PieceKind::King).index()].count();
            if count > 1 {
                let color_name = match color {
                    Color::White => "white",
                    Color::Black => "black",
                };
                return Err(PositionError::TooManyKings {
                    color: color_name,
                    count,
                });
            }
        }

        Ok(())
    }

    /// Return a pretty-printable wrapper for this position.
    pub fn pretty(&self) -> PrettyPosition<'_> {
        PrettyPosition(self)
    }
}

/// Return `true` if the bishop set covers both light and dark squares.
fn bishops_on_both_colors(bishops: Bitboard) -> bool {
    let mut light = false;
    let mut dark = false;
    for sq in bishops {
        if (sq.rank() + sq.file()) % 2 == 0 {
            dark = true;
        } else {
            light = true;
        }
    }
    light && dark
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{}\")", self)
    }
}

/// Wrapper for pretty-printing a position as an 8x8 grid.
pub struct PrettyPosition<'a>(&'a Position);

impl fmt::Display for PrettyPosition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = self.0;
        for rank in (0u8..8).rev() {
            write!(f, "{}  ", rank + 1)?;
            for file in 0u8..8 {
                let sq = Square::from_rank_file(rank, file);
                let c = match pos.piece_on(sq) {
                    Some(piece) => piece.fen_char(),
                    None => '.',
                };
                if file < 7 {
                    write!(f, "{c} ")?;
                } else {
                    write!(f, "{c}")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::Position;
    use crate::chess_move::{Move, PromotionPiece};
    use crate::color::Color;
    use crate::piece::Piece;
    use crate::piece_kind::PieceKind;
    use crate::square::Square;

    #[test]
    fn starting_position_validates() {
        let pos = Position::starting();
        pos.validate().unwrap();
    }

    #[test]
    fn starting_position_piece_on() {
        let pos = Position::starting();
        assert_eq!(
            pos.piece_on(Square::E1),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert_eq!(
            pos.piece_on(Square::D8),
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
        assert_eq!(
            pos.piece_on(Square::A1),
            Some(Piece::new(Color::White, PieceKind::Rook))
        );
        assert_eq!(
            pos.piece_on(Square::E7),
            Some(Piece::new(Color::Black, PieceKind::Pawn))
        );
        assert_eq!(pos.piece_on(Square::E4), None);
    }

    #[test]
    fn starting_occupancy() {
        let pos = Position::starting();
        assert_eq!(pos.occupied().count(), 32);
        assert_eq!(pos.side(Color::White).count(), 16);
        assert_eq!(pos.side(Color::Black).count(), 16);
        assert_eq!(pos.side_to_move(), Color::White);
    }

    #[test]
    fn king_squares() {
        let pos = Position::starting();
        assert_eq!(pos.king_square(Color::White), Some(Square::E1));
        assert_eq!(pos.king_square(Color::Black), Some(Square::E8));
    }

    #[test]
    fn make_move_is_pure() {
        let pos = Position::starting();
        let next = pos.make_move(Move::new(Square::E2, Square::E4));
        // The original is untouched.
        assert!(pos.occupied().contains(Square::E2));
        assert!(!pos.occupied().contains(Square::E4));
        // The new position reflects the move.
        assert!(!next.occupied().contains(Square::E2));
        assert_eq!(
            next.piece_on(Square::E4),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
        assert_eq!(next.side_to_move(), Color::Black);
        next.validate().unwrap();
    }

    #[test]
    fn make_move_capture_removes_victim() {
        // White pawn e4 takes black pawn d5.
        let pos: Position = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w"
            .parse()
            .unwrap();
        let next = pos.make_move(Move::new(Square::E4, Square::D5));
        assert_eq!(
            next.piece_on(Square::D5),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
        assert_eq!(next.side(Color::Black).count(), 15);
        next.validate().unwrap();
    }

    #[test]
    fn make_move_promotion_swaps_piece_kind() {
        let pos: Position = "8/P7/8/8/8/8/k7/4K3 w".parse().unwrap();
        let next = pos.make_move(Move::new_promotion(
            Square::A7,
            Square::A8,
            PromotionPiece::Queen,
        ));
        assert_eq!(
            next.piece_on(Square::A8),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
        assert!(next.pieces(Piece::new(Color::White, PieceKind::Pawn)).is_empty());
        next.validate().unwrap();
    }

    #[test]
    fn make_move_empty_source_is_identity() {
        let pos = Position::starting();
        let next = pos.make_move(Move::new(Square::E4, Square::E5));
        assert_eq!(next, pos);
    }

    #[test]
    fn make_move_enemy_source_is_identity() {
        // White to move, but the source square holds a black pawn.
        let pos = Position::starting();
        let next = pos.make_move(Move::new(Square::E7, Square::E5));
        assert_eq!(next, pos);
    }

    #[test]
    fn in_check_detects_all_attacker_types() {
        // Rook check down the e-file.
        let pos: Position = "4r2k/8/8/8/8/8/8/4K3 w".parse().unwrap();
        assert!(pos.in_check());

        // Bishop check on the long diagonal.
        let pos: Position = "7k/8/8/8/8/2b5/8/4K3 w".parse().unwrap();
        assert!(pos.in_check());

        // Queen check along a rank.
        let pos: Position = "7k/8/8/8/8/8/8/q3K3 w".parse().unwrap();
        assert!(pos.in_check());

        // Knight check.
        let pos: Position = "7k/8/8/8/8/3n4/8/4K3 w".parse().unwrap();
        assert!(pos.in_check());

        // Pawn check (black pawn attacks diagonally down the board).
        let pos: Position = "7k/8/8/8/8/8/3p4/4K3 w".parse().unwrap();
        assert!(pos.in_check());

        // Adjacent enemy king "check" (used by legality filtering).
        let pos: Position = "8/8/8/8/8/8/4k3/4K3 w".parse().unwrap();
        assert!(pos.in_check());
    }

    #[test]
    fn check_ray_blocked_by_any_piece() {
        // The rook's ray to the king is blocked by its own pawn.
        let pos: Position = "4r2k/4p3/8/8/8/8/8/4K3 w".parse().unwrap();
        assert!(!pos.in_check());

        // Blocked by a white piece as well.
        let pos: Position = "4r2k/8/8/8/4N3/8/8/4K3 w".parse().unwrap();
        assert!(!pos.in_check());
    }

    #[test]
    fn sliding_check_requires_matching_slider() {
        // A rook on the diagonal is not a check.
        let pos: Position = "7k/8/8/8/8/2r5/8/4K3 w".parse().unwrap();
        assert!(!pos.in_check());

        // A bishop on the file is not a check.
        let pos: Position = "4b2k/8/8/8/8/8/8/4K3 w".parse().unwrap();
        assert!(!pos.in_check());
    }

    #[test]
    fn missing_king_reports_no_check() {
        let pos: Position = "7k/8/8/8/8/8/8/4Q3 b".parse().unwrap();
        // White has no king; white is never "in check".
        assert!(!pos.king_attacked(Color::White));
    }

    #[test]
    fn checkmate_and_stalemate() {
        // Back-corner queen mate.
        let mate: Position = "7k/6Q1/5K2/8/8/8/8/8 b".parse().unwrap();
        assert!(mate.is_checkmate());
        assert!(!mate.is_stalemate());

        // Classic queen stalemate.
        let stale: Position = "k7/2K5/1Q6/8/8/8/8/8 b".parse().unwrap();
        assert!(stale.is_stalemate());
        assert!(!stale.is_checkmate());

        let starting = Position::starting();
        assert!(!starting.is_checkmate());
        assert!(!starting.is_stalemate());
    }

    #[test]
    fn insufficient_material_lone_kings() {
        let pos: Position = "7k/8/8/8/8/8/8/K7 w".parse().unwrap();
        assert!(pos.is_insufficient_material());
    }

    #[test]
    fn insufficient_material_single_minor() {
        let knight: Position = "7k/8/8/8/8/8/8/KN6 w".parse().unwrap();
        assert!(knight.is_insufficient_material());

        let bishop: Position = "7k/8/8/8/8/8/8/KB6 w".parse().unwrap();
        assert!(bishop.is_insufficient_material());
    }

    #[test]
    fn sufficient_material_heavy_pieces() {
        let pawn: Position = "7k/8/8/8/8/8/P7/K7 w".parse().unwrap();
        assert!(!pawn.is_insufficient_material());

        let rook: Position = "7k/8/8/8/8/8/8/KR6 w".parse().unwrap();
        assert!(!rook.is_insufficient_material());

        let queen: Position = "7k/8/8/8/8/8/8/KQ6 w".parse().unwrap();
        assert!(!queen.is_insufficient_material());
    }

    #[test]
    fn sufficient_material_minor_combinations() {
        // Knight + bishop can force mate.
        let nb: Position = "7k/8/8/8/8/8/8/KNB5 w".parse().unwrap();
        assert!(!nb.is_insufficient_material());

        // Bishops on both square colors can force mate (c1 is dark, d1 is light).
        let bb: Position = "7k/8/8/8/8/8/8/K1BB4 w".parse().unwrap();
        assert!(!bb.is_insufficient_material());

        // Three knights can, in principle, force mate.
        let nnn: Position = "7k/8/8/8/8/8/8/KNNN4 w".parse().unwrap();
        assert!(!nnn.is_insufficient_material());
    }

    #[test]
    fn insufficient_material_same_color_bishops() {
        // Two bishops on the same square color cannot force mate.
        // c1 and e1 are both dark squares.
        let pos: Position = "7k/8/8/8/8/8/8/K1B1B3 w".parse().unwrap();
        assert!(pos.is_insufficient_material());
    }

    #[test]
    fn two_knights_insufficient() {
        let pos: Position = "7k/8/8/8/8/8/8/KNN5 w".parse().unwrap();
        assert!(pos.is_insufficient_material());
    }

    #[test]
    fn pretty_print_grid() {
        let pos = Position::starting();
        let output = format!("{}", pos.pretty());
        assert!(output.contains("r n b q k b n r"));
        assert!(output.contains("R N B Q K B N R"));
        assert!(output.contains("a b c d e f g h"));
    }
}
