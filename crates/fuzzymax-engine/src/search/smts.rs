//! Softmax tree search.
//!
//! A negamax walk that replaces the hard max over child values with
//! log-sum-exp, a smooth maximum that rewards positions with several good
//! replies rather than a single best one. The move reported in the PV is
//! sampled with probability proportional to each child's softmax weight, so
//! repeated searches of the same position can pick different moves.

use fuzzymax_core::Position;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{SearchContext, SearchOutcome, Strategy};

/// Softmax temperature. Higher values sharpen toward the plain maximum.
const BETA: f64 = 1.0;

pub struct SoftmaxSearch {
    rng: StdRng,
}

impl SoftmaxSearch {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sampling for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn smts(&mut self, pos: &Position, depth: u8, ctx: &mut SearchContext<'_>) -> SearchOutcome {
        if ctx.enter_node() {
            return SearchOutcome::leaf(pos);
        }

        if depth == 0 {
            return SearchOutcome::leaf(pos);
        }

        let moves = pos.legal_moves();
        if moves.is_empty() {
            return SearchOutcome::leaf(pos);
        }

        let mut values = Vec::with_capacity(moves.len());
        let mut lines = Vec::with_capacity(moves.len());

        for &mv in &moves {
            let child = self.smts(&pos.make_move(mv), depth - 1, ctx);
            values.push(-child.value);
            lines.push(child.pv);
            if ctx.aborted() {
                // Unwind with whatever we have; the driver discards it.
                break;
            }
        }

        let max_val = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let weights: Vec<f64> = values.iter().map(|v| (BETA * (v - max_val)).exp()).collect();
        let total: f64 = weights.iter().sum();

        // total >= 1.0 since the maximal child has weight exactly 1.
        let value = max_val + total.ln() / BETA;

        let mut pick = self.rng.gen_range(0.0..total);
        let mut chosen = 0;
        for (i, &w) in weights.iter().enumerate() {
            if pick < w {
                chosen = i;
                break;
            }
            pick -= w;
        }

        let mut pv = Vec::with_capacity(1 + lines[chosen].len());
        pv.push(moves[chosen]);
        pv.append(&mut lines[chosen]);

        SearchOutcome { value, pv }
    }
}

impl Default for SoftmaxSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for SoftmaxSearch {
    fn name(&self) -> &'static str {
        "softmax"
    }

    fn search(
        &mut self,
        pos: &Position,
        depth: u8,
        ctx: &mut SearchContext<'_>,
    ) -> SearchOutcome {
        self.smts(pos, depth, ctx)
    }
}
