//! Single-player session against the scripted opponent
//!
//! The opponent opens with a random city, then answers every accepted
//! city with a random unused one. On harder difficulties it may slip a
//! fake city into its candidates; the player can call that out.

use super::catalog::CityCatalog;
use super::chain::ChainState;
use super::cheat::{fake_city_name, should_cheat};
use super::command::Command;
use super::difficulty::DifficultyProfile;
use super::outcome::{
    EndReason, MoveResult, Score, SingleOpening, SingleSummary, Submission, Verdict,
};
use super::random::RandomSource;
use super::rules::{fold, terminal_letter, validate_city};
use super::{GameOver, GameRules, PlayerId};
use crate::error::EngineError;
use std::collections::HashSet;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Ended,
}

/// One human-vs-bot game, owned by one player.
#[derive(Debug, Clone)]
pub struct SingleGameSession {
    owner: PlayerId,
    difficulty: DifficultyProfile,
    chain: ChainState,
    score: Score,
    /// Set once the opponent offered a fake city; never cleared
    cheated: bool,
    /// Folded names of fakes the opponent made up during this session
    invented: HashSet<String>,
    last_move_at: Instant,
    state: SessionState,
}

impl SingleGameSession {
    /// Create a session with the opponent's opening city already played.
    pub fn start(
        owner: PlayerId,
        difficulty: DifficultyProfile,
        catalog: &CityCatalog,
        rng: &dyn RandomSource,
        now: Instant,
    ) -> Result<(Self, SingleOpening), EngineError> {
        let city = catalog
            .random_city(rng)
            .ok_or(EngineError::EmptyCatalog)?
            .to_string();

        let mut chain = ChainState::new();
        chain.push(city.clone());

        let session = Self {
            owner,
            difficulty,
            chain,
            score: Score {
                player: 0,
                opponent: 1,
            },
            cheated: false,
            invented: HashSet::new(),
            last_move_at: now,
            state: SessionState::Active,
        };
        let opening = SingleOpening {
            required: session.chain.required_letter(),
            city,
            difficulty,
        };
        Ok((session, opening))
    }

    /// Handle one parsed input. City info needs the external fact provider,
    /// so it comes back as [`Submission::LookupFact`] for the caller.
    pub fn submit(
        &mut self,
        command: Command,
        catalog: &CityCatalog,
        rules: &GameRules,
        rng: &dyn RandomSource,
        now: Instant,
    ) -> Submission {
        if self.state == SessionState::Ended {
            return Submission::Done(MoveResult::NoSession);
        }

        let result = match command {
            Command::Surrender => self.finish(EndReason::Surrendered),
            Command::Hint => self.hints(catalog, rules),
            Command::CityInfo => {
                return match self.chain.last() {
                    Some(city) => Submission::LookupFact {
                        city: city.to_string(),
                        fabricated: self.cheated && self.is_fake(city, catalog),
                    },
                    None => Submission::Done(MoveResult::NothingPlayed),
                };
            }
            Command::Challenge => {
                if self.cheated {
                    self.finish(EndReason::CaughtCheating)
                } else {
                    MoveResult::ChallengeRejected
                }
            }
            Command::Guess(text) => self.play(&text, catalog, rules, rng, now),
        };
        Submission::Done(result)
    }

    /// Up to `hint_limit` unused catalog cities for the required letter.
    pub fn hints(&self, catalog: &CityCatalog, rules: &GameRules) -> MoveResult {
        if !self.difficulty.hints_enabled {
            return MoveResult::HintsDisabled;
        }
        let Some(letter) = self.chain.required_letter() else {
            return MoveResult::NoHints;
        };
        let cities: Vec<String> = catalog
            .starting_with(letter)
            .filter(|city| !self.chain.contains(city))
            .take(rules.hint_limit)
            .map(str::to_string)
            .collect();
        if cities.is_empty() {
            MoveResult::NoHints
        } else {
            MoveResult::Hints { letter, cities }
        }
    }

    /// Apply a city guess and, if accepted, the opponent's answer.
    pub fn play(
        &mut self,
        guess: &str,
        catalog: &CityCatalog,
        rules: &GameRules,
        rng: &dyn RandomSource,
        now: Instant,
    ) -> MoveResult {
        if self.state == SessionState::Ended {
            return MoveResult::NoSession;
        }

        let accepted = match validate_city(guess, &self.chain, |g| catalog.resolve(g)) {
            Ok(city) => city,
            Err(e) => return MoveResult::Rejected(e),
        };

        self.chain.push(accepted.clone());
        self.chain.count_turn();
        self.score.player += 1;
        self.last_move_at = now;

        if self.chain.len() >= rules.max_cities {
            return self.finish(EndReason::CityLimit);
        }

        let mut candidates: Vec<String> = terminal_letter(&accepted)
            .map(|letter| {
                catalog
                    .starting_with(letter)
                    .filter(|city| !self.chain.contains(city))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if should_cheat(
            self.chain.turn_count(),
            rules.cheat_after_turns,
            self.difficulty.cheat_probability,
            rng,
        ) {
            let fake = fake_city_name(rng);
            // A made-up name that happens to be real (or played) is no lie
            if !catalog.is_known(&fake) && !self.chain.contains(&fake) {
                debug!(player = %self.owner, fake = %fake, "opponent cheats");
                self.invented.insert(fold(&fake));
                self.cheated = true;
                candidates.push(fake);
            }
        }

        if candidates.is_empty() {
            return self.finish(EndReason::OpponentExhausted);
        }

        let pick = rng.below(candidates.len()).min(candidates.len() - 1);
        let reply = candidates.swap_remove(pick);
        self.chain.push(reply.clone());
        self.score.opponent += 1;
        self.last_move_at = now;

        if self.chain.len() >= rules.max_cities {
            return self.finish(EndReason::CityLimit);
        }

        MoveResult::Replied {
            accepted,
            required: self.chain.required_letter(),
            reply,
            score: self.score,
        }
    }

    /// Move the session to `Ended`. Only the first call yields a summary.
    pub fn end(&mut self, reason: EndReason) -> Option<SingleSummary> {
        if self.state == SessionState::Ended {
            return None;
        }
        self.state = SessionState::Ended;
        Some(SingleSummary {
            player: self.owner.clone(),
            reason,
            score: self.score,
            verdict: verdict(reason, self.score),
            last_city: self.chain.last().map(str::to_string),
        })
    }

    fn finish(&mut self, reason: EndReason) -> MoveResult {
        match self.end(reason) {
            Some(summary) => MoveResult::GameOver(GameOver::Single(summary)),
            None => MoveResult::NoSession,
        }
    }

    /// True when the player's turn has outlasted the difficulty's limit.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_move_at) > self.difficulty.turn_limit()
    }

    fn is_fake(&self, city: &str, catalog: &CityCatalog) -> bool {
        catalog.is_fake(city) || self.invented.contains(&fold(city))
    }

    pub fn owner(&self) -> &PlayerId {
        &self.owner
    }

    pub fn difficulty(&self) -> &DifficultyProfile {
        &self.difficulty
    }

    pub fn chain(&self) -> &ChainState {
        &self.chain
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn cheated(&self) -> bool {
        self.cheated
    }

    pub fn last_move_at(&self) -> Instant {
        self.last_move_at
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }
}

/// Surrender and timeouts always lose, catching a cheat or exhausting the
/// opponent always wins; anything else is settled by score.
fn verdict(reason: EndReason, score: Score) -> Verdict {
    match reason {
        EndReason::Surrendered | EndReason::TimeExpired => Verdict::Loss,
        EndReason::CaughtCheating | EndReason::OpponentExhausted => Verdict::Win,
        _ => match score.player.cmp(&score.opponent) {
            std::cmp::Ordering::Greater => Verdict::Win,
            std::cmp::Ordering::Less => Verdict::Loss,
            std::cmp::Ordering::Equal => Verdict::Draw,
        },
    }
}
