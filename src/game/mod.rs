//! Game logic: city catalog, chain rules, single-player and multiplayer
//! state machines

pub mod catalog;
pub mod chain;
pub mod cheat;
pub mod command;
pub mod difficulty;
pub mod multi;
pub mod outcome;
pub mod random;
pub mod rules;
pub mod single;

pub use catalog::CityCatalog;
pub use chain::ChainState;
pub use command::Command;
pub use difficulty::DifficultyProfile;
pub use multi::{GameState, MultiplayerGame, TieBreak};
pub use outcome::{
    EndReason, GameOver, JoinOpening, MoveResult, MultiSummary, Score, SingleOpening,
    SingleSummary, Submission, TurnHandoff, Verdict,
};
pub use random::RandomSource;
pub use rules::MoveError;
pub use single::{SessionState, SingleGameSession};

use std::fmt;

/// Most cities one game may hold
pub const MAX_CITIES_IN_GAME: usize = 200;

/// Most hint candidates offered at once
pub const HINT_LIMIT: usize = 5;

/// Player turns before the opponent may start cheating
pub const CHEAT_AFTER_TURNS: u32 = 3;

/// A player identity as given by the transport (numeric id or handle).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        PlayerId(id.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        PlayerId(id)
    }
}

/// Short token identifying a multiplayer game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        GameId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        GameId(id.to_string())
    }
}

/// Tunable limits shared by both game modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    pub max_cities: usize,
    pub hint_limit: usize,
    pub cheat_after_turns: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            max_cities: MAX_CITIES_IN_GAME,
            hint_limit: HINT_LIMIT,
            cheat_after_turns: CHEAT_AFTER_TURNS,
        }
    }
}
