//! Injectable randomness
//!
//! Every random decision in the engine (opening city, opponent's pick,
//! cheat roll, fake-name synthesis) goes through [`RandomSource`], so tests
//! can script exact outcomes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Source of uniform random values, shared across threads.
pub trait RandomSource: Send + Sync {
    /// Uniform index in `0..upper`. Returns 0 when `upper` is 0.
    fn below(&self, upper: usize) -> usize;

    /// Uniform value in `[0, 1)`.
    fn unit(&self) -> f64;
}

/// Pick one element uniformly at random.
pub fn choose<'a, T>(rng: &dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.below(items.len()))
}

/// Thread-local OS-seeded generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn below(&self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        rand::rng().random_range(0..upper)
    }

    fn unit(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Deterministic generator for reproducible games.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn below(&self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random_range(0..upper)
    }

    fn unit(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random::<f64>()
    }
}

/// Replays fixed sequences. Picks are reduced modulo the requested range.
/// Once a sequence runs dry, picks return 0 and rolls return a value just
/// below 1 (so no probability check passes).
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    picks: Mutex<VecDeque<usize>>,
    rolls: Mutex<VecDeque<f64>>,
}

/// Roll returned when no scripted roll is left
pub const EXHAUSTED_ROLL: f64 = 1.0 - f64::EPSILON;

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue index picks.
    pub fn with_picks<I: IntoIterator<Item = usize>>(self, picks: I) -> Self {
        self.picks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(picks);
        self
    }

    /// Queue unit rolls.
    pub fn with_rolls<I: IntoIterator<Item = f64>>(self, rolls: I) -> Self {
        self.rolls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(rolls);
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn below(&self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        let next = self
            .picks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(0);
        next % upper
    }

    fn unit(&self) -> f64 {
        self.rolls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(EXHAUSTED_ROLL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_random_in_range() {
        let rng = ThreadRandom;
        for _ in 0..100 {
            assert!(rng.below(7) < 7);
            let roll = rng.unit();
            assert!((0.0..1.0).contains(&roll));
        }
        assert_eq!(rng.below(0), 0);
    }

    #[test]
    fn test_seeded_random_is_deterministic() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        for _ in 0..20 {
            assert_eq!(a.below(1000), b.below(1000));
        }
        assert_eq!(a.unit(), b.unit());
    }

    #[test]
    fn test_scripted_random_replays_and_wraps() {
        let rng = ScriptedRandom::new().with_picks([1, 5]).with_rolls([0.25]);
        assert_eq!(rng.below(3), 1);
        assert_eq!(rng.below(3), 2);
        assert_eq!(rng.below(3), 0);
        assert_eq!(rng.unit(), 0.25);
        assert_eq!(rng.unit(), EXHAUSTED_ROLL);
    }

    #[test]
    fn test_choose() {
        let rng = ScriptedRandom::new().with_picks([2]);
        assert_eq!(choose(&rng, &["a", "b", "c"]), Some(&"c"));
        assert_eq!(choose::<&str>(&rng, &[]), None);
    }
}
