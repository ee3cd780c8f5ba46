//! Error types
//!
//! User move errors are not here: they are data ([`crate::game::MoveError`])
//! reported back to the sender. These are lookup, resolution and startup
//! failures.

use crate::game::GameId;
use crate::PlayerId;
use std::path::PathBuf;
use thiserror::Error;

/// Recoverable engine errors. None of them change any game state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
    #[error("player {0} is already in a game")]
    AlreadyPlaying(PlayerId),
    #[error("game {0} not found or already finished")]
    UnknownGame(GameId),
    #[error("player {player} is not the invitee of game {game}")]
    NotInvitee { game: GameId, player: PlayerId },
    #[error("game {0} has already started")]
    AlreadyStarted(GameId),
    #[error("cannot invite the engine itself")]
    InviteeIsEngine,
    #[error("cannot invite yourself")]
    InviteeIsInviter,
    #[error("invitee could not be resolved")]
    UnresolvableInvitee,
    #[error("no free game id")]
    NoFreeGameId,
    #[error("city catalog is empty")]
    EmptyCatalog,
}

/// Failure reading an external city list.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read city list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Malformed configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} must be a positive number of seconds, got {value:?}")]
    InvalidSeconds { key: &'static str, value: String },
    #[error("{key} must not be empty")]
    Empty { key: &'static str },
}

/// Failure of the external fact provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactError {
    #[error("fact lookup unavailable")]
    Unavailable,
    #[error("fact lookup failed: {0}")]
    Failed(String),
}
