//! Special inputs that bypass chain validation

/// What a player's raw text means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Surrender,
    Hint,
    /// "What is this city?" about the last city in the chain
    CityInfo,
    /// "That city is fake!"
    Challenge,
    /// Anything else is a city guess (trimmed, original case kept)
    Guess(String),
}

const SURRENDER: [&str; 3] = ["🏳 сдаться", "сдаться", "/surrender"];
const HINT: [&str; 3] = ["💡 подсказка", "подсказка", "/hint"];
const CITY_INFO: [&str; 3] = ["❓ что за город?", "что за город?", "/city"];
const CHALLENGE: [&str; 4] = ["фейк", "обман", "fake", "cheat"];

impl Command {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let key = text.to_lowercase();
        let key = key.as_str();
        if SURRENDER.contains(&key) {
            Command::Surrender
        } else if HINT.contains(&key) {
            Command::Hint
        } else if CITY_INFO.contains(&key) {
            Command::CityInfo
        } else if CHALLENGE.contains(&key) {
            Command::Challenge
        } else {
            Command::Guess(text.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("🏳 Сдаться"), Command::Surrender);
        assert_eq!(Command::parse("  сдаться "), Command::Surrender);
        assert_eq!(Command::parse("💡 Подсказка"), Command::Hint);
        assert_eq!(Command::parse("/hint"), Command::Hint);
        assert_eq!(Command::parse("❓ Что за город?"), Command::CityInfo);
        assert_eq!(Command::parse("Фейк"), Command::Challenge);
        assert_eq!(Command::parse("ОБМАН"), Command::Challenge);
        assert_eq!(Command::parse("cheat"), Command::Challenge);
    }

    #[test]
    fn test_everything_else_is_a_guess() {
        assert_eq!(
            Command::parse("  Астрахань "),
            Command::Guess("Астрахань".to_string())
        );
        assert_eq!(Command::parse("фейковый"), Command::Guess("фейковый".to_string()));
    }
}
