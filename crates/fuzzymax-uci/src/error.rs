//! UCI protocol errors.

/// Errors that can occur during UCI protocol handling.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// The `position` command is missing the `startpos` or `fen` keyword.
    #[error("malformed position command: missing startpos or fen keyword")]
    MalformedPosition,

    /// Failed to parse a FEN string.
    #[error("invalid FEN \"{fen}\": {source}")]
    InvalidFen {
        /// The FEN string that failed to parse.
        fen: String,
        /// The underlying parse error.
        source: fuzzymax_core::FenError,
    },

    /// A move string in the `position` command could not be parsed.
    #[error("invalid move: {uci_move}")]
    InvalidMove {
        /// The move string that failed to parse.
        uci_move: String,
    },

    /// A syntactically valid move that is not legal in the position it
    /// would be played in.
    #[error("illegal move: {uci_move}")]
    IllegalMove {
        /// The offending move in coordinate notation.
        uci_move: String,
    },

    /// A `go` parameter was given without a value.
    #[error("missing value for go parameter: {param}")]
    MissingGoValue {
        /// The parameter name.
        param: String,
    },

    /// A `go` parameter value could not be parsed.
    #[error("invalid value for go parameter {param}: {value}")]
    InvalidGoValue {
        /// The parameter name.
        param: String,
        /// The unparseable value.
        value: String,
    },

    /// A `setoption` command that does not follow `name <id> value <x>`.
    #[error("malformed setoption command")]
    MalformedSetOption,

    /// A `setoption` value that does not fit the option's type.
    #[error("invalid value for option {name}: {value}")]
    InvalidOptionValue {
        /// The option name.
        name: String,
        /// The rejected value.
        value: String,
    },

    /// An I/O error occurred while reading from stdin.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
