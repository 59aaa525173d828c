//! Game history for threefold repetition detection.

/// Append-only record of position hashes seen during a game.
///
/// The engine records the hash of every position reached on the board
/// (including the initial one) and asks whether the current position has
/// occurred three or more times.
#[derive(Debug, Clone, Default)]
pub struct GameHistory {
    hashes: Vec<u64>,
}

impl GameHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a position hash.
    pub fn record(&mut self, hash: u64) {
        self.hashes.push(hash);
    }

    /// True if `hash` appears three or more times in the history.
    pub fn is_threefold(&self, hash: u64) -> bool {
        self.hashes.iter().filter(|&&h| h == hash).count() >= 3
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Forget all recorded positions. Used when a new game starts.
    pub fn clear(&mut self) {
        self.hashes.clear();
    }
}
