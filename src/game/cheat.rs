//! The scripted opponent's cheat mechanic
//!
//! Deciding whether to lie and producing the lie are separate so each can
//! be tested on its own.

use super::random::{choose, RandomSource};

const FAKE_PREFIXES: [&str; 5] = ["Ново", "Верхне", "Нижне", "Старо", "Бело"];
const FAKE_SUFFIXES: [&str; 5] = ["град", "бург", "поль", "донск", "горск"];

const FAMOUS_FOR: [&str; 3] = ["университетом", "метро", "парком"];
const LANDMARKS: [&str; 3] = ["башня", "мост", "музей"];

/// Whether the opponent cheats this turn.
///
/// Never before more than `after_turns` accepted player turns; after that,
/// one roll against `probability`.
pub fn should_cheat(
    turn_count: u32,
    after_turns: u32,
    probability: f64,
    rng: &dyn RandomSource,
) -> bool {
    if turn_count <= after_turns {
        return false;
    }
    rng.unit() < probability
}

/// Invent a plausible city name: one prefix plus one suffix.
pub fn fake_city_name(rng: &dyn RandomSource) -> String {
    let prefix = choose(rng, &FAKE_PREFIXES).copied().unwrap_or("Ново");
    let suffix = choose(rng, &FAKE_SUFFIXES).copied().unwrap_or("град");
    format!("{}{}", prefix, suffix)
}

/// Invent one "fact" about a city that does not exist.
pub fn fabricate_fact(city: &str, rng: &dyn RandomSource) -> String {
    match rng.below(4) {
        0 => format!("{} основан в {} веке", city, 10 + rng.below(12)),
        1 => format!("Население: ~{} тыс. человек", 50 + rng.below(451)),
        2 => format!(
            "Известен своим {}",
            choose(rng, &FAMOUS_FOR).copied().unwrap_or("парком")
        ),
        _ => format!(
            "Главная достопримечательность: {}",
            choose(rng, &LANDMARKS).copied().unwrap_or("музей")
        ),
    }
}
