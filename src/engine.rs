//! The game engine: every inbound event a transport can deliver
//!
//! The engine owns the catalog, the registry and the stats, and routes each
//! message to the player's single-player session or multiplayer game. State
//! machines never see a lock; the registry hands them out one key at a time.

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::facts::{FactProvider, OfflineFacts};
use crate::game::difficulty::profile;
use crate::game::outcome::FACT_UNAVAILABLE;
use crate::game::random::ThreadRandom;
use crate::game::{
    CityCatalog, Command, EndReason, GameId, GameOver, JoinOpening, MoveResult, MultiplayerGame,
    PlayerId, RandomSource, SingleGameSession, SingleOpening, Submission,
};
use crate::registry::SessionRegistry;
use crate::stats::{PlayerStats, StatsBook};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Numeric game ids are drawn from `GAME_ID_BASE..GAME_ID_BASE + GAME_ID_SPAN`
const GAME_ID_BASE: usize = 1000;
const GAME_ID_SPAN: usize = 9000;

/// Collisions tolerated before an invitation gives up
const GAME_ID_ATTEMPTS: usize = 32;

/// Who an invitation is addressed to, as the transport saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteeRef {
    /// Identity taken from a forwarded message
    Forwarded(PlayerId),
    /// A typed handle, with or without a leading `@`
    Handle(String),
}

impl InviteeRef {
    fn resolve(&self) -> Result<PlayerId, EngineError> {
        match self {
            InviteeRef::Forwarded(id) => Ok(id.clone()),
            InviteeRef::Handle(handle) => {
                let handle = handle.trim();
                let handle = handle.strip_prefix('@').unwrap_or(handle).trim();
                if handle.is_empty() || handle.chars().any(char::is_whitespace) {
                    return Err(EngineError::UnresolvableInvitee);
                }
                Ok(PlayerId::from(handle))
            }
        }
    }
}

/// A player's record plus the catalog size, as shown on the stats screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsReport {
    pub stats: PlayerStats,
    pub catalog_size: usize,
}

pub struct Engine {
    config: EngineConfig,
    catalog: Arc<CityCatalog>,
    registry: SessionRegistry,
    stats: StatsBook,
    facts: Arc<dyn FactProvider>,
    rng: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
}

impl Engine {
    pub fn new(config: EngineConfig, catalog: CityCatalog) -> Self {
        Self {
            config,
            catalog: Arc::new(catalog),
            registry: SessionRegistry::new(),
            stats: StatsBook::new(),
            facts: Arc::new(OfflineFacts::default()),
            rng: Arc::new(ThreadRandom),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_random(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_facts(mut self, facts: Arc<dyn FactProvider>) -> Self {
        self.facts = facts;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CityCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Start a single-player game on the named difficulty.
    pub fn start_single(
        &self,
        player: &PlayerId,
        difficulty: &str,
    ) -> Result<SingleOpening, EngineError> {
        let difficulty = profile(difficulty)?;
        if self.registry.is_seated(player) {
            return Err(EngineError::AlreadyPlaying(player.clone()));
        }

        let (session, opening) = SingleGameSession::start(
            player.clone(),
            difficulty,
            &self.catalog,
            self.rng.as_ref(),
            self.clock.now(),
        )?;
        self.registry.seat_single(session)?;

        info!(player = %player, difficulty = difficulty.id, city = %opening.city, "single game started");
        Ok(opening)
    }

    /// Handle one text message from `player`.
    pub fn submit(&self, player: &PlayerId, text: &str) -> MoveResult {
        let command = Command::parse(text);
        let now = self.clock.now();

        if let Some(id) = self.registry.game_of(player) {
            return self.submit_multi(&id, player, command, now);
        }
        if !self.registry.is_seated(player) {
            // Invited or inviting, but nobody has joined yet
            if let Some(id) = self.registry.pending_game(player) {
                return self.submit_multi(&id, player, command, now);
            }
        }

        let submission = self.registry.with_single(player, |session| {
            session.submit(
                command,
                &self.catalog,
                &self.config.rules,
                self.rng.as_ref(),
                now,
            )
        });
        let Some(submission) = submission else {
            return MoveResult::NoSession;
        };
        let result = self.resolve(submission);
        if let MoveResult::GameOver(over) = &result {
            self.registry.remove_ended_single(player);
            self.settle(over);
        }
        result
    }

    fn submit_multi(
        &self,
        id: &GameId,
        player: &PlayerId,
        command: Command,
        now: Instant,
    ) -> MoveResult {
        let submission = self.registry.with_game(id, |game| {
            game.submit(player, command, &self.catalog, &self.config.rules, now)
        });
        let Some(submission) = submission else {
            return MoveResult::NoSession;
        };
        let result = self.resolve(submission);
        if let MoveResult::GameOver(over) = &result {
            self.registry.remove_ended_game(id);
            self.settle(over);
        }
        result
    }

    /// End a player's single-player session. Does nothing when there is none.
    pub fn end_single(&self, player: &PlayerId, reason: EndReason) -> Option<GameOver> {
        let summary = self
            .registry
            .with_single(player, |session| session.end(reason))??;
        self.registry.remove_ended_single(player);
        let over = GameOver::Single(summary);
        self.settle(&over);
        Some(over)
    }

    /// Create a game waiting for the invitee. The inviter is seated only once
    /// the invitee joins.
    pub fn invite(&self, inviter: &PlayerId, invitee: &InviteeRef) -> Result<GameId, EngineError> {
        let invitee = invitee.resolve()?;
        if invitee == self.config.engine_id {
            return Err(EngineError::InviteeIsEngine);
        }
        if invitee == *inviter {
            return Err(EngineError::InviteeIsInviter);
        }
        if self.registry.is_seated(inviter) {
            return Err(EngineError::AlreadyPlaying(inviter.clone()));
        }

        let now = self.clock.now();
        for _ in 0..GAME_ID_ATTEMPTS {
            let id = GameId::new((GAME_ID_BASE + self.rng.below(GAME_ID_SPAN)).to_string());
            let game = MultiplayerGame::invite(id.clone(), inviter.clone(), invitee.clone(), now);
            match self.registry.insert_game(game) {
                Ok(()) => {
                    info!(game = %id, inviter = %inviter, invitee = %invitee, "invitation created");
                    return Ok(id);
                }
                Err(_) => debug!(game = %id, "game id taken, drawing again"),
            }
        }
        warn!(inviter = %inviter, "no free game id");
        Err(EngineError::NoFreeGameId)
    }

    /// Accept an invitation. Both players get seated and the opening city
    /// is played.
    pub fn join(&self, id: &GameId, player: &PlayerId) -> Result<JoinOpening, EngineError> {
        let now = self.clock.now();
        let opening = self
            .registry
            .with_game(id, |game| {
                game.check_join(player)?;
                let (p1, p2) = (game.player1().clone(), game.player2().clone());
                self.registry.seat_pair(id, &p1, &p2)?;
                let opening = game.join(player, &self.catalog, self.rng.as_ref(), now);
                match &opening {
                    Ok(_) => self.registry.forget_invitation(game),
                    Err(_) => {
                        self.registry.unseat_multi(id, &p1);
                        self.registry.unseat_multi(id, &p2);
                    }
                }
                opening
            })
            .ok_or_else(|| EngineError::UnknownGame(id.clone()))??;

        info!(game = %id, city = %opening.city, turn = %opening.turn_owner, "multiplayer game started");
        Ok(opening)
    }

    /// End every stalled session, game and invitation. Each ending is
    /// returned exactly once, here or from the move that got there first.
    pub fn sweep_timeouts(&self) -> Vec<GameOver> {
        let now = self.clock.now();
        let mut ended = Vec::new();

        for player in self.registry.single_players() {
            if let Some(mut session) = self.registry.take_expired_single(&player, now) {
                if let Some(summary) = session.end(EndReason::TimeExpired) {
                    ended.push(GameOver::Single(summary));
                }
            }
        }

        for id in self.registry.game_ids() {
            let taken = self.registry.take_expired_game(
                &id,
                now,
                self.config.multiplayer_turn_limit,
                self.config.invitation_limit,
            );
            if let Some(summary) = taken.and_then(|mut game| game.expire()) {
                ended.push(GameOver::Multi(summary));
            }
        }

        for over in &ended {
            self.settle(over);
        }
        debug!(ended = ended.len(), "timeout sweep done");
        ended
    }

    /// A player's record; zeros for strangers.
    pub fn stats(&self, player: &PlayerId) -> StatsReport {
        StatsReport {
            stats: self.stats.get(player),
            catalog_size: self.catalog.len(),
        }
    }

    fn resolve(&self, submission: Submission) -> MoveResult {
        match submission {
            Submission::Done(result) => result,
            Submission::LookupFact { city, fabricated } => self.describe(city, fabricated),
        }
    }

    /// Ask the fact provider about `city`. Runs without any registry lock.
    fn describe(&self, city: String, fabricated: bool) -> MoveResult {
        let fact = if fabricated {
            self.facts.fabricate_fact(&city)
        } else {
            self.facts.fetch_fact(&city)
        };
        let text = fact.unwrap_or_else(|e| {
            warn!(city = %city, error = %e, "fact lookup failed");
            FACT_UNAVAILABLE.to_string()
        });
        MoveResult::CityInfo {
            city,
            text,
            challengeable: fabricated,
        }
    }

    fn settle(&self, over: &GameOver) {
        self.stats.record(over);
        match over {
            GameOver::Single(s) => info!(
                player = %s.player,
                reason = ?s.reason,
                verdict = ?s.verdict,
                score = %format!("{}:{}", s.score.player, s.score.opponent),
                "single game over"
            ),
            GameOver::Multi(m) => info!(
                game = %m.game_id,
                reason = ?m.reason,
                winner = ?m.winner.as_ref().map(PlayerId::as_str),
                score = %format!("{}:{}", m.score1, m.score2),
                "multiplayer game over"
            ),
        }
    }
}
