//! Error types for FEN parsing and position validation.

/// Errors that occur when parsing a FEN-style placement string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    /// A required field (placement or active color) is missing.
    #[error("missing FEN field: {field}")]
    MissingField {
        /// The field name.
        field: &'static str,
    },
    /// The piece placement section does not have exactly 8 ranks.
    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount {
        /// Number of ranks found.
        found: usize,
    },
    /// A rank in the piece placement describes more or fewer than 8 squares.
    #[error("rank {rank_index} describes {length} squares, expected 8")]
    BadRankLength {
        /// Zero-based rank index (0 = rank 8 in FEN, 7 = rank 1).
        rank_index: usize,
        /// Number of squares described.
        length: usize,
    },
    /// An unrecognized character appeared in the piece placement.
    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar {
        /// The invalid character.
        character: char,
    },
    /// The active color field is not "w" or "b".
    #[error("invalid active color: \"{found}\"")]
    InvalidColor {
        /// The invalid color string.
        found: String,
    },
    /// The parsed position fails structural validation.
    #[error("invalid position: {source}")]
    InvalidPosition {
        /// The underlying validation error.
        #[from]
        source: PositionError,
    },
}

/// Errors from structural validation of a [`Position`](crate::Position).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// Two different piece bitboards claim the same square.
    #[error("overlapping piece bitboards")]
    OverlappingPieces,
    /// The occupancy bitboards do not equal the union of the piece bitboards.
    #[error("occupancy bitboards are inconsistent with piece bitboards")]
    InconsistentOccupancy,
    /// A side has more than one king.
    #[error("{color} has {count} kings")]
    TooManyKings {
        /// Which side has too many kings.
        color: &'static str,
        /// Number of kings found.
        count: u32,
    },
}
