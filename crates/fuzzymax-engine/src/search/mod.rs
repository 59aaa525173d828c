//! Stochastic tree search with iterative deepening.
//!
//! Two interchangeable strategies drive the tree walk: softmax-weighted
//! exploration ([`smts::SoftmaxSearch`]) and multi-armed-bandit exploration
//! ([`mabs::BanditSearch`]). Both share the same contract: search a position
//! to a fixed depth and return a value (from the side to move's perspective)
//! plus a principal variation. The [`Searcher`] wraps either strategy in an
//! iterative-deepening loop with cooperative cancellation.

pub mod control;
pub mod mabs;
pub mod smts;

use fuzzymax_core::{Move, Position};
use tracing::debug;

use crate::eval::evaluate;
use control::SearchControl;
use mabs::BanditSearch;
use smts::SoftmaxSearch;

/// Value and principal variation returned by one strategy call.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Score from the perspective of the side to move at the searched node.
    pub value: f64,
    /// Principal variation. Empty at depth 0 and at positions with no
    /// legal moves; callers classify mate/stalemate themselves.
    pub pv: Vec<Move>,
}

impl SearchOutcome {
    /// Leaf outcome: static evaluation, no line.
    fn leaf(pos: &Position) -> Self {
        Self {
            value: evaluate(pos) as f64,
            pv: Vec::new(),
        }
    }
}

/// Per-search bookkeeping threaded through the recursion.
pub struct SearchContext<'a> {
    control: &'a SearchControl,
    nodes: u64,
    aborted: bool,
}

impl<'a> SearchContext<'a> {
    pub fn new(control: &'a SearchControl) -> Self {
        Self {
            control,
            nodes: 0,
            aborted: false,
        }
    }

    /// Nodes visited so far.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// True once the controller requested a stop mid-search. The current
    /// depth's result must then be discarded.
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    /// Count a node and poll the controller. Returns `true` if the search
    /// should unwind immediately.
    fn enter_node(&mut self) -> bool {
        self.nodes += 1;
        if !self.aborted && self.control.should_stop(self.nodes) {
            self.aborted = true;
        }
        self.aborted
    }
}

/// A depth-limited search algorithm.
pub trait Strategy {
    /// Human-readable name, used in option handling and logs.
    fn name(&self) -> &'static str;

    /// Search `pos` to `depth` plies. Depth 0 and positions without legal
    /// moves return the static evaluation with an empty PV.
    fn search(&mut self, pos: &Position, depth: u8, ctx: &mut SearchContext<'_>)
    -> SearchOutcome;
}

/// Which strategy the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// Softmax tree search (the default).
    #[default]
    Softmax,
    /// Multi-armed bandit search.
    Bandit,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn Strategy + Send> {
        match self {
            StrategyKind::Softmax => Box::new(SoftmaxSearch::new()),
            StrategyKind::Bandit => Box::new(BanditSearch::new()),
        }
    }
}

/// Result of a completed iterative-deepening search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move at the deepest completed depth. `None` when the root has
    /// no legal moves (mate, stalemate, or a bare board).
    pub best_move: Option<Move>,
    /// Principal variation of the deepest completed depth.
    pub pv: Vec<Move>,
    /// Value of the deepest completed depth, side to move's perspective.
    pub value: f64,
    /// Total nodes visited across all depths.
    pub nodes: u64,
    /// Deepest fully completed depth; 0 if no depth completed.
    pub depth: u8,
}

/// Iterative-deepening driver around a [`Strategy`].
pub struct Searcher {
    strategy: Box<dyn Strategy + Send>,
}

impl Searcher {
    pub fn new(kind: StrategyKind) -> Self {
        Self {
            strategy: kind.build(),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Replace the strategy. Takes effect on the next search.
    pub fn set_strategy(&mut self, kind: StrategyKind) {
        self.strategy = kind.build();
    }

    /// Search `pos` at depths 1..=`max_depth`, stopping early when the
    /// controller says so.
    ///
    /// Calls `on_iter(depth, value, nodes, pv)` after each completed depth so
    /// the caller can emit `info` lines. A depth interrupted mid-search is
    /// discarded in favor of the last completed one.
    pub fn search<F>(
        &mut self,
        pos: &Position,
        max_depth: u8,
        control: &SearchControl,
        mut on_iter: F,
    ) -> SearchResult
    where
        F: FnMut(u8, f64, u64, &[Move]),
    {
        let mut ctx = SearchContext::new(control);

        let mut completed_pv: Vec<Move> = Vec::new();
        let mut completed_value = evaluate(pos) as f64;
        let mut completed_depth: u8 = 0;

        for depth in 1..=max_depth {
            if control.should_stop_iterating() {
                break;
            }

            let outcome = self.strategy.search(pos, depth, &mut ctx);

            if ctx.aborted() {
                debug!(depth, nodes = ctx.nodes(), "depth interrupted, discarding");
                break;
            }

            completed_pv = outcome.pv;
            completed_value = outcome.value;
            completed_depth = depth;

            on_iter(depth, completed_value, ctx.nodes(), &completed_pv);

            // Nothing deeper to find once the root is terminal.
            if completed_pv.is_empty() {
                break;
            }
        }

        SearchResult {
            best_move: completed_pv.first().copied(),
            pv: completed_pv,
            value: completed_value,
            nodes: ctx.nodes(),
            depth: completed_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn run(kind: StrategyKind, pos: &Position, depth: u8) -> SearchResult {
        let control = SearchControl::new_infinite(Arc::new(AtomicBool::new(false)));
        Searcher::new(kind).search(pos, depth, &control, |_, _, _, _| {})
    }

    #[test]
    fn depth_one_from_start_picks_a_legal_opening_move() {
        let start = Position::starting();
        let legal = start.legal_moves();

        for kind in [StrategyKind::Softmax, StrategyKind::Bandit] {
            let result = run(kind, &start, 1);
            let best = result.best_move.expect("start position has moves");
            assert!(legal.contains(&best));
            assert_eq!(result.pv.len(), 1);
            assert_eq!(result.depth, 1);
            // Material is balanced one ply deep.
            assert!(result.value.abs() < 1e6);
        }
    }

    #[test]
    fn mated_root_reports_no_move() {
        let mated: Position = "7k/6Q1/5K2/8/8/8/8/8 b".parse().unwrap();
        assert!(mated.is_checkmate());

        for kind in [StrategyKind::Softmax, StrategyKind::Bandit] {
            let result = run(kind, &mated, 3);
            assert!(result.best_move.is_none());
            assert!(result.pv.is_empty());
        }
    }

    #[test]
    fn pv_is_a_playable_line() {
        let pos: Position = "4k3/8/8/8/8/8/3PP3/4K3 w".parse().unwrap();
        let result = run(StrategyKind::Softmax, &pos, 3);

        let mut current = pos;
        for &mv in &result.pv {
            assert!(current.legal_moves().contains(&mv), "unplayable pv move {mv}");
            current = current.make_move(mv);
        }
    }

    #[test]
    fn preset_stop_flag_yields_depth_zero_fallback() {
        let flag = Arc::new(AtomicBool::new(true));
        let control = SearchControl::new_infinite(flag);
        let result = Searcher::new(StrategyKind::Softmax).search(
            &Position::starting(),
            5,
            &control,
            |_, _, _, _| {},
        );
        assert_eq!(result.depth, 0);
        assert!(result.best_move.is_none());
        assert_eq!(result.value, 0.0);
    }

    #[test]
    fn on_iter_fires_once_per_completed_depth() {
        let pos = Position::starting();
        let control = SearchControl::new_infinite(Arc::new(AtomicBool::new(false)));
        let mut depths = Vec::new();
        Searcher::new(StrategyKind::Softmax).search(&pos, 3, &control, |d, _, _, _| {
            depths.push(d);
        });
        assert_eq!(depths, vec![1, 2, 3]);
    }

    #[test]
    fn mid_search_stop_keeps_last_completed_depth() {
        let pos = Position::starting();
        let flag = Arc::new(AtomicBool::new(false));
        let control = SearchControl::new_infinite(Arc::clone(&flag));
        let stop_after_first = Arc::clone(&flag);
        let result = Searcher::new(StrategyKind::Bandit).search(
            &pos,
            10,
            &control,
            move |_, _, _, _| {
                stop_after_first.store(true, Ordering::Release);
            },
        );
        assert!(result.depth >= 1);
        assert!(result.best_move.is_some());
    }
}
