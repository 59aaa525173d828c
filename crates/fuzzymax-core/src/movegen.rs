//! Legal move generation: pseudo-legal moves per piece type, filtered by
//! applying each move and rejecting those that leave the mover's king in
//! check.
//!
//! Castling and en passant are not part of the move set.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, queen_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::chess_move::{Move, PromotionPiece};
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

impl Position {
    /// Generate all legal moves for the side to move.
    ///
    /// Pseudo-legal generation is cheap; legality is settled by making each
    /// move and testing whether the mover's king is attacked in the result.
    /// That costs one make-move plus one check test per candidate, which is
    /// fine at chess branching factors.
    pub fn legal_moves(&self) -> Vec<Move> {
        let us = self.side_to_move();
        let mut moves = Vec::with_capacity(48);

        self.gen_pawn_moves(&mut moves);
        self.gen_knight_moves(&mut moves);
        self.gen_slider_moves(&mut moves);
        self.gen_king_moves(&mut moves);

        moves.retain(|&mv| !self.make_move(mv).king_attacked(us));
        moves
    }

    fn gen_pawn_moves(&self, moves: &mut Vec<Move>) {
        let us = self.side_to_move();
        let enemy = self.side(us.flip());
        let forward = us.forward();
        let pawns = self.pieces(Piece::new(us, PieceKind::Pawn));

        for from in pawns {
            // Single push onto an empty square.
            if let Some(to) = from.offset(forward, 0) {
                if !self.occupied().contains(to) {
                    push_pawn_move(moves, from, to, us.promotion_rank());

                    // Double push from the starting rank, through two empty
                    // squares.
                    if from.rank() == us.pawn_rank() {
                        if let Some(two) = to.offset(forward, 0) {
                            if !self.occupied().contains(two) {
                                moves.push(Move::new(from, two));
                            }
                        }
                    }
                }
            }

            // Diagonal captures, only onto enemy-occupied squares.
            for d_file in [-1, 1] {
                if let Some(to) = from.offset(forward, d_file) {
                    if enemy.contains(to) {
                        push_pawn_move(moves, from, to, us.promotion_rank());
                    }
                }
            }
        }
    }

    fn gen_knight_moves(&self, moves: &mut Vec<Move>) {
        let us = self.side_to_move();
        let friendly = self.side(us);
        let knights = self.pieces(Piece::new(us, PieceKind::Knight));

        for from in knights {
            for to in knight_attacks(from) & !friendly {
                moves.push(Move::new(from, to));
            }
        }
    }

    fn gen_slider_moves(&self, moves: &mut Vec<Move>) {
        let us = self.side_to_move();
        let friendly = self.side(us);
        let occupied = self.occupied();

        let sliders: [(PieceKind, fn(Square, Bitboard) -> Bitboard); 3] = [
            (PieceKind::Bishop, bishop_attacks),
            (PieceKind::Rook, rook_attacks),
            (PieceKind::Queen, queen_attacks),
        ];

        for (kind, attacks) in sliders {
            for from in self.pieces(Piece::new(us, kind)) {
                for to in attacks(from, occupied) & !friendly {
                    moves.push(Move::new(from, to));
                }
            }
        }
    }

    fn gen_king_moves(&self, moves: &mut Vec<Move>) {
        let us = self.side_to_move();
        let friendly = self.side(us);
        let kings = self.pieces(Piece::new(us, PieceKind::King));

        for from in kings {
            for to in king_attacks(from) & !friendly {
                moves.push(Move::new(from, to));
            }
        }
    }
}

/// Push a pawn move, expanding to the four underpromotion variants when the
/// destination is the back rank.
fn push_pawn_move(moves: &mut Vec<Move>, from: Square, to: Square, promotion_rank: u8) {
    if to.rank() == promotion_rank {
        for promo in PromotionPiece::ALL {
            moves.push(Move::new_promotion(from, to, promo));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}
