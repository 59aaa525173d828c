//! Event-driven, multi-threaded UCI engine.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};

use tracing::{debug, info, warn};

use fuzzymax_core::{GameHistory, Position};
use fuzzymax_engine::{SearchControl, SearchResult, Searcher, StrategyKind};

use crate::command::{Command, GoParams, PositionInfo, UciOption, parse_command};
use crate::error::UciError;

/// Default iterative-deepening cap when `go` carries no `depth`.
const DEFAULT_MAX_DEPTH: u8 = 25;

/// Configuration knobs adjustable via `setoption`.
struct EngineConfig {
    /// Active search strategy; `MAB` switches softmax <-> bandit.
    strategy: StrategyKind,
    /// Depth cap for `go` without an explicit `depth`.
    max_depth: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Softmax,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Internal engine state — idle or searching.
enum EngineState {
    Idle,
    Searching,
}

/// Events processed by the main engine loop.
enum EngineEvent {
    UciCommand(Result<Command, UciError>),
    SearchDone(SearchDone),
    InputClosed,
    InputFailed(io::Error),
}

/// Payload returned by the search thread when it finishes.
struct SearchDone {
    result: SearchResult,
    searcher: Searcher,
}

/// The UCI engine, holding the current position and game history.
///
/// Runs an event-driven loop on the main thread, dispatching searches to a
/// worker thread so `stop` and `quit` stay responsive mid-search.
pub struct UciEngine {
    position: Position,
    history: GameHistory,
    searcher: Option<Searcher>,
    searcher_strategy: StrategyKind,
    state: EngineState,
    stop_flag: Arc<AtomicBool>,
    config: EngineConfig,
}

impl UciEngine {
    /// Create a new engine at the starting position.
    pub fn new() -> Self {
        let config = EngineConfig::default();
        let mut history = GameHistory::new();
        let position = Position::starting();
        history.record(position.hash());
        Self {
            position,
            history,
            searcher: Some(Searcher::new(config.strategy)),
            searcher_strategy: config.strategy,
            state: EngineState::Idle,
            stop_flag: Arc::new(AtomicBool::new(false)),
            config,
        }
    }

    /// Run the UCI event loop, reading from stdin until `quit` or input closes.
    pub fn run(mut self) -> Result<(), UciError> {
        let (tx, rx) = mpsc::channel::<EngineEvent>();

        // Spawn stdin reader thread
        let stdin_tx = tx.clone();
        std::thread::spawn(move || {
            let stdin = io::stdin();
            let reader = stdin.lock();
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        let trimmed = line.trim().to_string();
                        if trimmed.is_empty() {
                            continue;
                        }
                        debug!(cmd = %trimmed, "received UCI command");
                        let cmd = parse_command(&trimmed);
                        if stdin_tx.send(EngineEvent::UciCommand(cmd)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = stdin_tx.send(EngineEvent::InputFailed(e));
                        break;
                    }
                }
            }
            let _ = stdin_tx.send(EngineEvent::InputClosed);
        });

        for event in &rx {
            match event {
                EngineEvent::UciCommand(Ok(cmd)) => match cmd {
                    Command::Uci => self.handle_uci(),
                    Command::IsReady => self.handle_isready(),
                    Command::UciNewGame => self.handle_ucinewgame(),
                    Command::Position(info) => self.handle_position(*info),
                    Command::Go(params) => self.handle_go(params, &tx),
                    Command::SetOption(opt) => self.handle_setoption(opt),
                    Command::Stop => self.handle_stop(),
                    Command::Quit => {
                        // Stop any active search and wait for it to finish
                        if !matches!(self.state, EngineState::Idle) {
                            self.handle_stop();
                            for ev in &rx {
                                if let EngineEvent::SearchDone(done) = ev {
                                    self.finish_search(done);
                                    break;
                                }
                            }
                        }
                        break;
                    }
                    Command::Unknown(_) => {}
                },
                EngineEvent::UciCommand(Err(e)) => {
                    warn!(error = %e, "UCI parse error");
                    println!("info string error {e}");
                }
                EngineEvent::SearchDone(done) => {
                    self.finish_search(done);
                }
                EngineEvent::InputClosed => break,
                EngineEvent::InputFailed(e) => {
                    warn!(error = %e, "stdin read failed");
                    return Err(e.into());
                }
            }
        }

        info!("fuzzymax shutting down");
        Ok(())
    }

    fn handle_uci(&self) {
        println!("id name fuzzymax");
        println!("id author the fuzzymax developers");
        println!("option name MAB type check default false");
        println!("option name MaxDepth type spin default {DEFAULT_MAX_DEPTH} min 1 max 64");
        println!("uciok");
    }

    fn handle_isready(&self) {
        println!("readyok");
    }

    fn handle_ucinewgame(&mut self) {
        self.position = Position::starting();
        self.history.clear();
        self.history.record(self.position.hash());
    }

    fn handle_setoption(&mut self, option: UciOption) {
        match option {
            UciOption::Mab(enabled) => {
                self.config.strategy = if enabled {
                    StrategyKind::Bandit
                } else {
                    StrategyKind::Softmax
                };
            }
            UciOption::MaxDepth(depth) => {
                self.config.max_depth = depth;
            }
        }
    }

    fn handle_position(&mut self, info: PositionInfo) {
        self.position = info.position;
        self.history = info.history;
    }

    fn handle_go(&mut self, params: GoParams, tx: &mpsc::Sender<EngineEvent>) {
        if !matches!(self.state, EngineState::Idle) {
            warn!("go received while not idle, ignoring");
            return;
        }

        // Reset stop flag
        self.stop_flag = Arc::new(AtomicBool::new(false));

        let control = match params.movetime {
            Some(budget) if !params.infinite => {
                SearchControl::new_timed(Arc::clone(&self.stop_flag), budget)
            }
            _ => SearchControl::new_infinite(Arc::clone(&self.stop_flag)),
        };

        let max_depth = params.depth.unwrap_or(self.config.max_depth);

        // Take the searcher — the search thread will own it until done
        let mut searcher = self
            .searcher
            .take()
            .unwrap_or_else(|| Searcher::new(self.config.strategy));
        if self.searcher_strategy != self.config.strategy {
            searcher.set_strategy(self.config.strategy);
            self.searcher_strategy = self.config.strategy;
        }
        debug!(strategy = searcher.strategy_name(), max_depth, "starting search");

        let position = self.position;
        let tx = tx.clone();

        std::thread::spawn(move || {
            let result = searcher.search(&position, max_depth, &control, |d, value, nodes, pv| {
                let elapsed_ms = control.elapsed().as_millis().max(1);
                let nps = (nodes as u128 * 1000) / elapsed_ms;

                let pv_str: String = pv
                    .iter()
                    .map(|m| m.to_uci())
                    .collect::<Vec<_>>()
                    .join(" ");

                println!(
                    "info depth {} score cp {} nodes {} nps {} time {} pv {}",
                    d,
                    value.round() as i64,
                    nodes,
                    nps,
                    elapsed_ms,
                    pv_str
                );
            });
            let _ = tx.send(EngineEvent::SearchDone(SearchDone { result, searcher }));
        });

        self.state = EngineState::Searching;
    }

    fn handle_stop(&mut self) {
        self.stop_flag.store(true, Ordering::Release);
    }

    fn finish_search(&mut self, done: SearchDone) {
        self.searcher = Some(done.searcher);
        self.state = EngineState::Idle;

        match done.result.best_move {
            Some(best) => {
                println!("bestmove {best}");
                // Play our own move so consecutive `go` commands continue
                // the game without an intervening `position`.
                self.position = self.position.make_move(best);
                self.history.record(self.position.hash());
                self.report_terminal_states();
            }
            None => {
                // Mate, stalemate, or a bare board at the root.
                println!("bestmove 0000");
                self.report_terminal_states();
            }
        }
    }

    /// Announce game-ending conditions of the current position.
    fn report_terminal_states(&self) {
        if self.position.is_checkmate() {
            info!(side = %self.position.side_to_move(), "checkmate");
            println!("info string checkmate");
        } else if self.position.is_stalemate() {
            info!("stalemate");
            println!("info string stalemate");
        }
        if self.history.is_threefold(self.position.hash()) {
            info!("threefold repetition");
            println!("info string draw by threefold repetition");
        }
        if self.position.is_insufficient_material() {
            info!("insufficient material");
            println!("info string draw by insufficient material");
        }
    }
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new()
    }
}
