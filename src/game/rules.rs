//! Chain rules for the city game
//!
//! A city is playable when:
//! - It has not been named before in this game (case-insensitive)
//! - Its first letter matches the terminal letter of the previous city
//! - The catalog knows it (checked by the caller, see [`validate_city`])

use super::chain::ChainState;

/// Letters no city starts with. When a name ends in one of them, the letter
/// before it constrains the next move instead.
pub const NON_TERMINAL_LETTERS: [char; 5] = ['ь', 'ъ', 'ы', 'й', 'ё'];

/// Why a city guess was refused. Never fatal: the sender is told and the
/// game carries on unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Nothing but whitespace was submitted
    Empty,
    /// The city has already been named in this game
    AlreadyUsed { city: String },
    /// The city starts with the wrong letter
    WrongLetter { required: char },
    /// Neither the catalog nor the fake list knows this name
    UnknownCity,
    /// The previous city yields no letter to continue from
    NoRequiredLetter,
}

impl MoveError {
    /// Returns a user-friendly error message
    pub fn message(&self) -> String {
        match self {
            MoveError::Empty => "Назовите город".to_string(),
            MoveError::AlreadyUsed { city } => format!("Город {} уже был!", city),
            MoveError::WrongLetter { required } => {
                format!("Нужен город на букву {}!", upper(*required))
            }
            MoveError::UnknownCity => "Я не знаю такого города!".to_string(),
            MoveError::NoRequiredLetter => "На этот город ходить нельзя".to_string(),
        }
    }
}

/// Case-folded comparison key for a city name.
pub fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Lowercase a single letter.
pub fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Uppercase a single letter for display.
pub fn upper(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}

/// First letter of a city, lowercased.
pub fn first_letter(city: &str) -> Option<char> {
    city.trim().chars().next().map(fold_char)
}

/// The letter the next city has to start with.
///
/// Skips one trailing non-terminal letter (`Пермь` -> `м`). Returns `None`
/// for an empty name, or a single non-terminal letter with nothing before it.
pub fn terminal_letter(city: &str) -> Option<char> {
    let mut chars = city.trim().chars().rev().map(fold_char);
    let last = chars.next()?;
    if NON_TERMINAL_LETTERS.contains(&last) {
        chars.next()
    } else {
        Some(last)
    }
}

/// True iff `city` was not played yet and starts with `required`.
/// Uniqueness is checked first and dominates the letter match.
pub fn is_playable(city: &str, required: char, used: &[String]) -> bool {
    let key = fold(city);
    if used.iter().any(|u| fold(u) == key) {
        return false;
    }
    first_letter(city) == Some(fold_char(required))
}

/// Validate a city guess against the chain.
///
/// `resolve` maps a guess to its display form when the name is acceptable
/// (known or fake, depending on the game mode). Checks in order:
/// 1. Not empty
/// 2. Playable: not already used, then first letter matches the chain's
///    required letter
/// 3. Name resolves
pub fn validate_city<'a, F>(guess: &str, chain: &ChainState, resolve: F) -> Result<String, MoveError>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let guess = guess.trim();
    if guess.is_empty() {
        return Err(MoveError::Empty);
    }

    let required = chain.required_letter().ok_or(MoveError::NoRequiredLetter)?;
    if !is_playable(guess, required, chain.cities()) {
        return Err(match chain.find(guess) {
            Some(city) => MoveError::AlreadyUsed {
                city: city.to_string(),
            },
            None => MoveError::WrongLetter { required },
        });
    }

    resolve(guess)
        .map(str::to_string)
        .ok_or(MoveError::UnknownCity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn known(guess: &str) -> Option<&'static str> {
        match fold(guess).as_str() {
            "москва" => Some("Москва"),
            "астрахань" => Some("Астрахань"),
            "абакан" => Some("Абакан"),
            "пермь" => Some("Пермь"),
            _ => None,
        }
    }

    fn chain_of(cities: &[&str]) -> ChainState {
        let mut chain = ChainState::new();
        for city in cities {
            chain.push(city.to_string());
        }
        chain
    }

    #[test]
    fn test_terminal_letter_plain() {
        assert_eq!(terminal_letter("Москва"), Some('а'));
        assert_eq!(terminal_letter("Омск"), Some('к'));
        assert_eq!(terminal_letter("Ростов-на-Дону"), Some('у'));
    }

    #[test]
    fn test_terminal_letter_skips_non_terminal() {
        assert_eq!(terminal_letter("Пермь"), Some('м'));
        assert_eq!(terminal_letter("Астрахань"), Some('н'));
        assert_eq!(terminal_letter("Чебоксары"), Some('р'));
        assert_eq!(terminal_letter("Волжский"), Some('и'));
    }

    #[test]
    fn test_terminal_letter_case_insensitive() {
        assert_eq!(terminal_letter("МОСКВА"), Some('а'));
        assert_eq!(terminal_letter("ПЕРМЬ"), Some('м'));
    }

    #[test]
    fn test_terminal_letter_degenerate() {
        assert_eq!(terminal_letter(""), None);
        assert_eq!(terminal_letter("   "), None);
        assert_eq!(terminal_letter("ь"), None);
        assert_eq!(terminal_letter("Я"), Some('я'));
    }

    #[test]
    fn test_is_playable() {
        let used = vec!["Москва".to_string()];
        assert!(is_playable("Астрахань", 'а', &used));
        assert!(is_playable("астрахань", 'А', &used));
        assert!(!is_playable("Омск", 'а', &used));
        assert!(!is_playable("москва", 'м', &used));
    }

    #[test]
    fn test_validate_accepts_display_form() {
        let chain = chain_of(&["Москва"]);
        assert_eq!(
            validate_city("  астрахань ", &chain, known),
            Ok("Астрахань".to_string())
        );
    }

    #[test]
    fn test_validate_order() {
        let chain = chain_of(&["Абакан", "Москва"]);

        // Repeat wins over a wrong letter
        assert_eq!(
            validate_city("АБАКАН", &chain, known),
            Err(MoveError::AlreadyUsed {
                city: "Абакан".to_string()
            })
        );
        // Wrong letter wins over an unknown name
        assert_eq!(
            validate_city("Зззз", &chain, known),
            Err(MoveError::WrongLetter { required: 'а' })
        );
        assert_eq!(
            validate_city("Ааааа", &chain, known),
            Err(MoveError::UnknownCity)
        );
        assert_eq!(validate_city("   ", &chain, known), Err(MoveError::Empty));
    }

    #[test]
    fn test_validate_empty_chain() {
        let chain = ChainState::new();
        assert_eq!(
            validate_city("Москва", &chain, known),
            Err(MoveError::NoRequiredLetter)
        );
    }

    #[test]
    fn test_validate_agrees_with_is_playable() {
        let chain = chain_of(&["Москва", "Абакан"]);
        for guess in ["Абакан", "Астрахань", "Москва", "Пермь"] {
            let playable = is_playable(guess, 'н', chain.cities());
            let accepted = validate_city(guess, &chain, known).is_ok();
            assert_eq!(playable, accepted, "{}", guess);
        }

        let chain = chain_of(&["Пермь"]);
        assert!(is_playable("Москва", 'м', chain.cities()));
        assert_eq!(validate_city("Москва", &chain, known), Ok("Москва".to_string()));
    }

    #[test]
    fn test_message_format() {
        assert_eq!(
            MoveError::WrongLetter { required: 'а' }.message(),
            "Нужен город на букву А!"
        );
        assert_eq!(MoveError::UnknownCity.message(), "Я не знаю такого города!");
    }

    proptest! {
        #[test]
        fn prop_non_terminal_ending_uses_previous_letter(
            stem in "[а-яА-Я]{1,12}",
            tail in prop::sample::select(NON_TERMINAL_LETTERS.to_vec()),
        ) {
            let city = format!("{}{}", stem, tail);
            let previous = stem.chars().last().map(fold_char);
            prop_assert_eq!(terminal_letter(&city), previous);
        }

        #[test]
        fn prop_used_city_never_playable(
            city in "[А-Я][а-я]{2,10}",
            other in "[А-Я][а-я]{2,10}",
        ) {
            let used = vec![other, city.to_uppercase()];
            let first = first_letter(&city).unwrap_or('а');
            prop_assert!(!is_playable(&city, first, &used));
        }
    }
}
