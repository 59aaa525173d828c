//! UCI command parsing.

use std::time::Duration;

use fuzzymax_core::{GameHistory, Move, Position};

use crate::error::UciError;

/// Parameters for the `go` command.
///
/// All fields are optional; a bare `go` searches to the configured
/// maximum depth.
#[derive(Debug, Clone, Default)]
pub struct GoParams {
    /// Search to this depth only.
    pub depth: Option<u8>,
    /// Search for exactly this duration.
    pub movetime: Option<Duration>,
    /// Search until `stop` (no time limit).
    pub infinite: bool,
}

/// A board position plus the hash history of every ply leading to it.
#[derive(Debug, Clone)]
pub struct PositionInfo {
    pub position: Position,
    pub history: GameHistory,
}

/// Configuration knobs settable via `setoption`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UciOption {
    /// `MAB` — switch between softmax (false) and bandit (true) search.
    Mab(bool),
    /// `MaxDepth` — iterative-deepening cap for `go` without `depth`.
    MaxDepth(u8),
}

/// A parsed UCI command.
#[derive(Debug)]
pub enum Command {
    /// `uci` -- identify the engine.
    Uci,
    /// `isready` -- synchronization ping.
    IsReady,
    /// `ucinewgame` -- reset engine state.
    UciNewGame,
    /// `position` -- set up a position with optional moves applied.
    Position(Box<PositionInfo>),
    /// `go` -- start searching with given parameters.
    Go(GoParams),
    /// `setoption` -- change an engine option.
    SetOption(UciOption),
    /// `stop` -- halt the current search.
    Stop,
    /// `quit` -- exit the engine.
    Quit,
    /// Unrecognized command (silently ignored per UCI convention).
    Unknown(String),
}

/// Parse a single line of UCI input into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(Command::Unknown(String::new()));
    }

    match tokens[0] {
        "uci" => Ok(Command::Uci),
        "isready" => Ok(Command::IsReady),
        "ucinewgame" => Ok(Command::UciNewGame),
        "stop" => Ok(Command::Stop),
        "quit" => Ok(Command::Quit),
        "position" => parse_position(&tokens[1..]),
        "go" => parse_go(&tokens[1..]),
        "setoption" => parse_setoption(&tokens[1..]),
        _ => Ok(Command::Unknown(tokens[0].to_string())),
    }
}

/// Parse the `position` command arguments.
///
/// Supports:
/// - `position startpos [moves e2e4 d7d5 ...]`
/// - `position fen <fen-string> [moves e2e4 d7d5 ...]`
///
/// Every move must parse and be legal in the position it is played from;
/// an illegal move is rejected rather than silently skipped. The hashes of
/// all intermediate positions are collected for repetition detection.
fn parse_position(tokens: &[&str]) -> Result<Command, UciError> {
    if tokens.is_empty() {
        return Err(UciError::MalformedPosition);
    }

    let (mut position, rest) = if tokens[0] == "startpos" {
        (Position::starting(), &tokens[1..])
    } else if tokens[0] == "fen" {
        let fen_end = tokens
            .iter()
            .position(|&t| t == "moves")
            .unwrap_or(tokens.len());
        let fen = tokens[1..fen_end].join(" ");
        let position: Position = fen.parse().map_err(|source| UciError::InvalidFen {
            fen: fen.clone(),
            source,
        })?;
        (position, &tokens[fen_end..])
    } else {
        return Err(UciError::MalformedPosition);
    };

    let mut history = GameHistory::new();
    history.record(position.hash());

    if !rest.is_empty() && rest[0] == "moves" {
        for uci_str in &rest[1..] {
            let mv = Move::from_uci(uci_str).ok_or_else(|| UciError::InvalidMove {
                uci_move: uci_str.to_string(),
            })?;
            if !position.legal_moves().contains(&mv) {
                return Err(UciError::IllegalMove {
                    uci_move: uci_str.to_string(),
                });
            }
            position = position.make_move(mv);
            history.record(position.hash());
        }
    }

    Ok(Command::Position(Box::new(PositionInfo {
        position,
        history,
    })))
}

/// Parse the `go` command arguments.
///
/// Supports: depth, movetime, infinite. Unknown tokens (wtime, btime and
/// friends included) are silently skipped.
fn parse_go(tokens: &[&str]) -> Result<Command, UciError> {
    let mut params = GoParams::default();

    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                params.depth = Some(parse_int(tokens.get(i + 1), "depth")?);
                i += 2;
            }
            "movetime" => {
                params.movetime = Some(parse_millis(tokens.get(i + 1), "movetime")?);
                i += 2;
            }
            "infinite" => {
                params.infinite = true;
                i += 1;
            }
            _ => {
                // Unknown token -- skip per UCI convention
                i += 1;
            }
        }
    }

    Ok(Command::Go(params))
}

/// Parse `setoption name <id> value <x>`.
fn parse_setoption(tokens: &[&str]) -> Result<Command, UciError> {
    if tokens.first() != Some(&"name") {
        return Err(UciError::MalformedSetOption);
    }
    let value_at = tokens
        .iter()
        .position(|&t| t == "value")
        .ok_or(UciError::MalformedSetOption)?;
    let name = tokens[1..value_at].join(" ");
    let value = tokens[value_at + 1..].join(" ");
    if name.is_empty() || value.is_empty() {
        return Err(UciError::MalformedSetOption);
    }

    let invalid = || UciError::InvalidOptionValue {
        name: name.clone(),
        value: value.clone(),
    };

    // Option names are case-insensitive per the UCI spec.
    match name.to_ascii_lowercase().as_str() {
        "mab" => {
            let enabled = match value.as_str() {
                "true" => true,
                "false" => false,
                _ => return Err(invalid()),
            };
            Ok(Command::SetOption(UciOption::Mab(enabled)))
        }
        "maxdepth" => {
            let depth: u8 = value.parse().map_err(|_| invalid())?;
            if depth == 0 {
                return Err(invalid());
            }
            Ok(Command::SetOption(UciOption::MaxDepth(depth)))
        }
        _ => Ok(Command::Unknown(format!("setoption {name}"))),
    }
}

/// Parse a millisecond value from a token.
fn parse_millis(token: Option<&&str>, param: &str) -> Result<Duration, UciError> {
    let ms: u64 = parse_int(token, param)?;
    Ok(Duration::from_millis(ms))
}

/// Parse an integer value from a token.
fn parse_int<T: std::str::FromStr>(token: Option<&&str>, param: &str) -> Result<T, UciError> {
    let value = token.ok_or_else(|| UciError::MissingGoValue {
        param: param.to_string(),
    })?;
    value.parse().map_err(|_| UciError::InvalidGoValue {
        param: param.to_string(),
        value: value.to_string(),
    })
}
