//! UCI protocol handling for fuzzymax.

pub mod command;
pub mod engine;
pub mod error;

pub use command::{Command, GoParams, PositionInfo, UciOption, parse_command};
pub use engine::UciEngine;
pub use error::UciError;
