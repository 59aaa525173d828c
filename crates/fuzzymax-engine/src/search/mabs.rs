//! Multi-armed bandit search.
//!
//! Each legal move at a node is a bandit arm. A fixed budget of simulation
//! iterations is spent according to UCB1: unplayed arms first, then the arm
//! with the best upper confidence bound. Each play recurses one ply deeper
//! and folds the negated child value into the arm's running average. The
//! final move is the arm with the best *average* reward; its PV continues
//! with the line of that arm's best single play.

use fuzzymax_core::{Move, Position};

use super::{SearchContext, SearchOutcome, Strategy};

/// Simulation budget per node.
const ITERATIONS: u32 = 100;

struct Arm {
    mv: Move,
    plays: u32,
    total_reward: f64,
    best_reward: f64,
    best_line: Vec<Move>,
}

impl Arm {
    fn new(mv: Move) -> Self {
        Self {
            mv,
            plays: 0,
            total_reward: 0.0,
            best_reward: f64::NEG_INFINITY,
            best_line: Vec::new(),
        }
    }

    fn average(&self) -> f64 {
        self.total_reward / self.plays as f64
    }

    fn ucb1(&self, iteration: u32) -> f64 {
        if self.plays == 0 {
            return f64::INFINITY;
        }
        self.average() + (2.0 * (iteration as f64).ln() / self.plays as f64).sqrt()
    }
}

#[derive(Default)]
pub struct BanditSearch;

impl BanditSearch {
    pub fn new() -> Self {
        Self
    }

    fn mabs(&mut self, pos: &Position, depth: u8, ctx: &mut SearchContext<'_>) -> SearchOutcome {
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

        let mut arms: Vec<Arm> = moves.into_iter().map(Arm::new).collect();

        for iteration in 1..=ITERATIONS {
            if ctx.aborted() {
                break;
            }

            let chosen = (0..arms.len())
                .max_by(|&a, &b| {
                    arms[a]
                        .ucb1(iteration)
                        .partial_cmp(&arms[b].ucb1(iteration))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap_or(0);

            let arm = &mut arms[chosen];
            let child = self.mabs(&pos.make_move(arm.mv), depth - 1, ctx);
            let reward = -child.value;

            arm.plays += 1;
            arm.total_reward += reward;
            if reward > arm.best_reward {
                arm.best_reward = reward;
                arm.best_line = child.pv;
            }
        }

        // Play the arm with the best average, not the best single reward.
        let best = arms
            .iter_mut()
            .filter(|arm| arm.plays > 0)
            .max_by(|a, b| {
                a.average()
                    .partial_cmp(&b.average())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        match best {
            Some(arm) => {
                let mut pv = Vec::with_capacity(1 + arm.best_line.len());
                pv.push(arm.mv);
                pv.append(&mut arm.best_line);
                SearchOutcome {
                    value: arm.average(),
                    pv,
                }
            }
            // Aborted before a single play finished.
            None => SearchOutcome::leaf(pos),
        }
    }
}

impl Strategy for BanditSearch {
    fn name(&self) -> &'static str {
        "bandit"
    }

    fn search(
        &mut self,
        pos: &Position,
        depth: u8,
        ctx: &mut SearchContext<'_>,
    ) -> SearchOutcome {
        self.mabs(pos, depth, ctx)
    }
}
