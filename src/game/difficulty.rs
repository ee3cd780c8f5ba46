//! Difficulty profiles for single-player games

use crate::error::EngineError;
use std::time::Duration;

/// Per-difficulty rules: turn time limit, hint availability and how often
/// the opponent tries to slip in a fake city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Seconds the player has for each turn
    pub turn_seconds: u64,
    pub hints_enabled: bool,
    /// Chance in `[0, 1)` that the opponent cheats on a turn
    pub cheat_probability: f64,
}

impl DifficultyProfile {
    pub fn turn_limit(&self) -> Duration {
        Duration::from_secs(self.turn_seconds)
    }
}

pub const EASY: DifficultyProfile = DifficultyProfile {
    id: "easy",
    name: "👶 Легкий",
    description: "Подсказки доступны, бот не мухлюет",
    turn_seconds: 60,
    hints_enabled: true,
    cheat_probability: 0.0,
};

pub const MEDIUM: DifficultyProfile = DifficultyProfile {
    id: "medium",
    name: "💪 Средний",
    description: "Без подсказок, стандартные правила",
    turn_seconds: 45,
    hints_enabled: false,
    cheat_probability: 0.0,
};

pub const HARD: DifficultyProfile = DifficultyProfile {
    id: "hard",
    name: "🔥 Сложный",
    description: "Бот может подсунуть фейковый город (5% шанс)",
    turn_seconds: 30,
    hints_enabled: false,
    cheat_probability: 0.05,
};

/// All profiles, easiest first
pub const PROFILES: [DifficultyProfile; 3] = [EASY, MEDIUM, HARD];

/// Look up a profile by id or display name.
pub fn profile(key: &str) -> Result<DifficultyProfile, EngineError> {
    let key = key.trim();
    PROFILES
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(key) || p.name == key)
        .copied()
        .ok_or_else(|| EngineError::UnknownDifficulty(key.to_string()))
}
