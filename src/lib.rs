//! Goroda - the city chain game
//!
//! Name a city that starts with the last letter of the previous one.
//! The engine runs single-player games against a scripted opponent and
//! two-player games, with a background scan ending stalled turns.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod facts;
pub mod game;
pub mod registry;
pub mod stats;
pub mod supervisor;

pub use config::EngineConfig;
pub use engine::{Engine, InviteeRef, StatsReport};
pub use error::{CatalogError, ConfigError, EngineError, FactError};
pub use game::{GameId, GameOver, MoveResult, PlayerId};
pub use supervisor::TimeoutSupervisor;
