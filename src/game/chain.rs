//! The chain of cities named so far in one game

use super::rules::{fold, terminal_letter};
use std::collections::HashSet;

/// Ordered record of played cities. Insertion order is play order and no
/// city appears twice (compared case-insensitively).
#[derive(Debug, Clone, Default)]
pub struct ChainState {
    used: Vec<String>,
    keys: HashSet<String>,
    turn_count: u32,
}

impl ChainState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a city. Returns false (and changes nothing) on a repeat.
    pub fn push(&mut self, city: String) -> bool {
        if !self.keys.insert(fold(&city)) {
            return false;
        }
        self.used.push(city);
        true
    }

    /// Count one accepted player turn.
    pub fn count_turn(&mut self) {
        self.turn_count += 1;
    }

    /// Accepted player turns so far
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, city: &str) -> bool {
        self.keys.contains(&fold(city))
    }

    /// The recorded form of a city if it was already played.
    pub fn find(&self, city: &str) -> Option<&str> {
        if !self.contains(city) {
            return None;
        }
        let key = fold(city);
        self.used
            .iter()
            .find(|u| fold(u) == key)
            .map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.used.last().map(String::as_str)
    }

    /// Letter the next city must start with, if the chain has one.
    pub fn required_letter(&self) -> Option<char> {
        self.last().and_then(terminal_letter)
    }

    pub fn cities(&self) -> &[String] {
        &self.used
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
