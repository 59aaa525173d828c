//! Attack patterns: precomputed offset tables for leapers, ray walks for sliders.
//!
//! Knight, king, and pawn attacks are fixed patterns baked into compile-time
//! tables. Sliding attacks walk outward square by square until any occupied
//! square blocks the ray; the blocking square itself is included, so callers
//! can treat an enemy blocker as a capture target and a friendly blocker is
//! masked off by the caller.

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::square::Square;

/// Knight move offsets as (rank, file) deltas.
const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (2, 1), (1, 2), (-1, 2), (-2, 1),
    (-2, -1), (-1, -2), (1, -2), (2, -1),
];

/// King move offsets as (rank, file) deltas.
const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0), (1, 1), (0, 1), (-1, 1),
    (-1, 0), (-1, -1), (0, -1), (1, -1),
];

/// Diagonal ray directions (bishop, and half of the queen).
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Orthogonal ray directions (rook, and the other half of the queen).
const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Build a leaper attack table from an offset list, bounds-checked against
/// the 8x8 grid.
const fn leaper_table(deltas: [(i8, i8); 8]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut index = 0u8;
    while index < 64 {
        let from = Square::from_index_unchecked(index);
        let mut bits = 0u64;
        let mut d = 0;
        while d < 8 {
            if let Some(to) = from.offset(deltas[d].0, deltas[d].1) {
                bits |= 1u64 << to.index();
            }
            d += 1;
        }
        table[index as usize] = Bitboard::new(bits);
        index += 1;
    }
    table
}

/// Build the pawn attack table for one color (diagonal-forward pattern only;
/// pushes are not attacks).
const fn pawn_table(color: Color) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let forward = color.forward();
    let mut index = 0u8;
    while index < 64 {
        let from = Square::from_index_unchecked(index);
        let mut bits = 0u64;
        if let Some(to) = from.offset(forward, -1) {
            bits |= 1u64 << to.index();
        }
        if let Some(to) = from.offset(forward, 1) {
            bits |= 1u64 << to.index();
        }
        table[index as usize] = Bitboard::new(bits);
        index += 1;
    }
    table
}

static KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(KNIGHT_DELTAS);
static KING_ATTACKS: [Bitboard; 64] = leaper_table(KING_DELTAS);
static PAWN_ATTACKS: [[Bitboard; 64]; Color::COUNT] =
    [pawn_table(Color::White), pawn_table(Color::Black)];

/// Squares a knight on `sq` attacks.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index()]
}

/// Squares a king on `sq` attacks.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index()]
}

/// Squares a pawn of `color` on `sq` attacks (captures only).
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index()]
}

/// Walk rays in the given directions from `sq` until blocked by `occupied`.
fn slider_attacks(sq: Square, occupied: Bitboard, dirs: [(i8, i8); 4]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for (d_rank, d_file) in dirs {
        let mut current = sq;
        while let Some(next) = current.offset(d_rank, d_file) {
            attacks = attacks.with(next);
            if occupied.contains(next) {
                break;
            }
            current = next;
        }
    }
    attacks
}

/// Squares a bishop on `sq` attacks given the occupied set.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    slider_attacks(sq, occupied, BISHOP_DIRS)
}

/// Squares a rook on `sq` attacks given the occupied set.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    slider_attacks(sq, occupied, ROOK_DIRS)
}

/// Squares a queen on `sq` attacks given the occupied set.
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}
