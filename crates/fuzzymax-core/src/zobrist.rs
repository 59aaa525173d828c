//! Zobrist hashing keys for position deduplication.
//!
//! Keys are generated at compile time from a xorshift64 stream, so hashes are
//! stable for the life of the process (they are only ever compared within one
//! game's history).

use crate::color::Color;
use crate::piece::Piece;
use crate::position::Position;

const SEED: u64 = 0x4655_5a5a_594d_4158; // "FUZZYMAX"

/// Xorshift64 PRNG. Returns (value, next_state).
const fn xorshift64(mut state: u64) -> (u64, u64) {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    (state, state)
}

/// Zobrist key for each (piece, square) pair, indexed by
/// `[Piece::index()][Square::index()]`.
pub(crate) static PIECE_SQUARE: [[u64; 64]; Piece::COUNT] = {
    let mut table = [[0u64; 64]; Piece::COUNT];
    let mut state = SEED;
    let mut piece = 0;
    while piece < Piece::COUNT {
        let mut sq = 0;
        while sq < 64 {
            let (val, next) = xorshift64(state);
            table[piece][sq] = val;
            state = next;
            sq += 1;
        }
        piece += 1;
    }
    table
};

/// Zobrist key XORed in when Black is the side to move.
pub(crate) static SIDE_TO_MOVE: u64 = {
    // Continue the stream past the 12 * 64 piece-square keys.
    let mut state = SEED;
    let mut i = 0;
    while i < Piece::COUNT * 64 {
        let (_, next) = xorshift64(state);
        state = next;
        i += 1;
    }
    let (val, _) = xorshift64(state);
    val
};

/// Compute the Zobrist hash of a position: XOR over every occupied
/// (piece, square) pair, plus the side key when Black moves.
pub(crate) fn hash_position(pos: &Position) -> u64 {
    let mut hash = 0u64;

    for piece in Piece::ALL {
        for sq in pos.pieces(piece) {
            hash ^= PIECE_SQUARE[piece.index()][sq.index()];
        }
    }

    if pos.side_to_move() == Color::Black {
        hash ^= SIDE_TO_MOVE;
    }

    hash
}
