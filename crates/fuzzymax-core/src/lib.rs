//! Core chess model: bitboards, positions, move generation, and hashing.
//!
//! This crate knows nothing about searching or protocols. It provides the
//! board representation ([`Position`]), legal move generation, FEN
//! parsing/rendering, Zobrist hashing, and repetition tracking the engine
//! layers are built on.

mod attacks;
mod bitboard;
mod chess_move;
mod color;
mod error;
mod fen;
mod history;
mod movegen;
mod piece;
mod piece_kind;
mod position;
mod square;
mod zobrist;

pub use bitboard::Bitboard;
pub use chess_move::{Move, PromotionPiece};
pub use color::Color;
pub use error::{FenError, PositionError};
pub use history::GameHistory;
pub use piece::Piece;
pub use piece_kind::PieceKind;
pub use position::{Position, PrettyPosition};
pub use square::Square;
