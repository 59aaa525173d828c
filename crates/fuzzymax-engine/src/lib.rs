//! Search and evaluation for fuzzymax.

pub mod eval;
pub mod search;

pub use eval::evaluate;
pub use search::control::SearchControl;
pub use search::{SearchOutcome, SearchResult, Searcher, Strategy, StrategyKind};
