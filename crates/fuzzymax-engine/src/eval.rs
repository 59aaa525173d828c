//! Material-only static evaluation.

use fuzzymax_core::{Color, Piece, PieceKind, Position};

/// Material values in centipawns indexed by [`PieceKind::index()`].
pub const PIECE_VALUE: [i32; PieceKind::COUNT] = [
    100,   // Pawn
    320,   // Knight
    330,   // Bishop
    500,   // Rook
    900,   // Queen
    20000, // King
];

/// Evaluate a position from the perspective of the side to move.
///
/// Sums piece values for White minus Black, then negates when Black moves.
/// Purely material; there are no positional terms.
pub fn evaluate(pos: &Position) -> i32 {
    let mut balance = 0;

    for kind in PieceKind::ALL {
        let value = PIECE_VALUE[kind.index()];
        let white = pos.pieces(Piece::new(Color::White, kind)).count() as i32;
        let black = pos.pieces(Piece::new(Color::Black, kind)).count() as i32;
        balance += value * (white - black);
    }

    match pos.side_to_move() {
        Color::White => balance,
        Color::Black => -balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_balanced() {
        assert_eq!(evaluate(&Position::starting()), 0);
    }

    #[test]
    fn extra_queen_scores_900_for_its_owner() {
        let white_up: Position = "4k3/8/8/8/8/8/8/3QK3 w".parse().unwrap();
        assert_eq!(evaluate(&white_up), 900);
    }

    #[test]
    fn score_is_from_side_to_move_perspective() {
        let white_to_move: Position = "4k3/8/8/8/8/8/8/3QK3 w".parse().unwrap();
        let black_to_move: Position = "4k3/8/8/8/8/8/8/3QK3 b".parse().unwrap();
        assert_eq!(evaluate(&white_to_move), -evaluate(&black_to_move));
        assert_eq!(evaluate(&black_to_move), -900);
    }

    #[test]
    fn mixed_material_sums() {
        // White: R + 2P. Black: N + B.
        let pos: Position = "4k3/8/8/8/2nb4/8/1PP5/R3K3 w".parse().unwrap();
        assert_eq!(evaluate(&pos), 500 + 200 - 320 - 330);
    }
}
