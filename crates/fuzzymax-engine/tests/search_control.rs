//! Integration tests for iterative deepening under cancellation.
//!
//! Verifies that wall-clock budgets and external stop flags terminate both
//! strategies promptly and that reported results stay legal in that case.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use fuzzymax_core::Position;
use fuzzymax_engine::{SearchControl, SearchResult, Searcher, StrategyKind};

const MATERIAL_GRAB_FEN: &str = "4k3/8/8/3q4/8/8/8/3QK3 w";

fn search_infinite(pos: &Position, kind: StrategyKind, depth: u8) -> SearchResult {
    let stopped = Arc::new(AtomicBool::new(false));
    let control = SearchControl::new_infinite(stopped);
    Searcher::new(kind).search(pos, depth, &control, |_, _, _, _| {})
}

#[test]
fn both_strategies_return_legal_moves_from_startpos() {
    let pos = Position::starting();
    let legal = pos.legal_moves();

    for kind in [StrategyKind::Softmax, StrategyKind::Bandit] {
        let result = search_infinite(&pos, kind, 2);
        let best = result.best_move.expect("startpos has legal moves");
        assert!(legal.contains(&best), "{best} is not legal from startpos");
        assert_eq!(result.depth, 2);
        assert!(result.nodes > 0);
    }
}

#[test]
fn both_strategies_take_the_free_queen() {
    let pos: Position = MATERIAL_GRAB_FEN.parse().unwrap();

    for kind in [StrategyKind::Softmax, StrategyKind::Bandit] {
        let result = search_infinite(&pos, kind, 1);
        let best = result.best_move.expect("position has legal moves");
        assert_eq!(best.to_uci(), "d1d5", "{kind:?} should capture the queen");
    }
}

#[test]
fn movetime_budget_terminates_deep_search() {
    // A depth far beyond what either strategy could finish; the clock must
    // cut it off. Cooperative cancellation may overshoot by one subtree, so
    // the bound is generous.
    let pos = Position::starting();
    let budget = Duration::from_millis(100);

    for kind in [StrategyKind::Softmax, StrategyKind::Bandit] {
        let stopped = Arc::new(AtomicBool::new(false));
        let control = SearchControl::new_timed(Arc::clone(&stopped), budget);
        let begin = Instant::now();
        let result = Searcher::new(kind).search(&pos, 64, &control, |_, _, _, _| {});
        assert!(
            begin.elapsed() < Duration::from_secs(10),
            "{kind:?} overran its budget"
        );
        // Depth 1 is cheap enough to always complete within the budget.
        assert!(result.best_move.is_some());
        assert!(result.depth >= 1);
    }
}

#[test]
fn external_stop_flag_halts_search_from_another_thread() {
    let pos = Position::starting();
    let stopped = Arc::new(AtomicBool::new(false));
    let control = SearchControl::new_infinite(Arc::clone(&stopped));

    let stopper = {
        let stopped = Arc::clone(&stopped);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            stopped.store(true, Ordering::Release);
        })
    };

    let begin = Instant::now();
    let result = Searcher::new(StrategyKind::Bandit).search(&pos, 64, &control, |_, _, _, _| {});
    stopper.join().unwrap();

    assert!(
        begin.elapsed() < Duration::from_secs(10),
        "stop flag should end the search promptly"
    );
    assert!(result.best_move.is_some());
}

#[test]
fn set_strategy_switches_the_active_search() {
    let pos: Position = MATERIAL_GRAB_FEN.parse().unwrap();
    let stopped = Arc::new(AtomicBool::new(false));
    let control = SearchControl::new_infinite(stopped);

    let mut searcher = Searcher::new(StrategyKind::Softmax);
    assert_eq!(searcher.strategy_name(), "softmax");

    searcher.set_strategy(StrategyKind::Bandit);
    assert_eq!(searcher.strategy_name(), "bandit");

    // The bandit is deterministic and scores the queen grab at exactly its
    // material gain; the softmax value would exceed it by the log-sum-exp
    // spread over the other moves.
    let result = searcher.search(&pos, 1, &control, |_, _, _, _| {});
    assert_eq!(result.best_move.unwrap().to_uci(), "d1d5");
    assert_eq!(result.value, 900.0);
}

#[test]
fn deeper_completed_result_replaces_shallower() {
    // With no cancellation pressure, the reported depth equals the cap and
    // each info callback sees monotonically increasing depths.
    let pos: Position = "7k/8/8/8/8/8/8/K7 w".parse().unwrap();
    let stopped = Arc::new(AtomicBool::new(false));
    let control = SearchControl::new_infinite(stopped);

    let mut seen = Vec::new();
    let result = Searcher::new(StrategyKind::Softmax).search(&pos, 4, &control, |d, _, _, _| {
        seen.push(d);
    });

    assert_eq!(seen, vec![1, 2, 3, 4]);
    assert_eq!(result.depth, 4);
    assert_eq!(result.pv.len(), 4);
}
