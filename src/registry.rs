//! Process-wide table of live games
//!
//! Every player holds at most one seat: either their single-player session
//! or a pointer to the multiplayer game they are in. Seats and games live in
//! sharded maps, so operations on different players or games do not block
//! each other.
//!
//! Invitations not yet joined are indexed by both players so a premature
//! move can be told apart from a move with no game at all.
//!
//! Lock order is games -> seats and games -> pending. Nothing takes a game
//! lock while holding a seat or pending lock.

use crate::error::EngineError;
use crate::game::{GameId, GameState, MultiplayerGame, PlayerId, SingleGameSession};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::time::{Duration, Instant};

/// What a seated player is doing
#[derive(Debug)]
pub enum Seat {
    Single(SingleGameSession),
    Multi(GameId),
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    seats: DashMap<PlayerId, Seat>,
    games: DashMap<GameId, MultiplayerGame>,
    pending: DashMap<PlayerId, Vec<GameId>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat a player in a new single-player session.
    pub fn seat_single(&self, session: SingleGameSession) -> Result<(), EngineError> {
        match self.seats.entry(session.owner().clone()) {
            Entry::Occupied(entry) => Err(EngineError::AlreadyPlaying(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(Seat::Single(session));
                Ok(())
            }
        }
    }

    /// Run `f` on a player's single-player session while holding its lock.
    pub fn with_single<R, F>(&self, player: &PlayerId, f: F) -> Option<R>
    where
        F: FnOnce(&mut SingleGameSession) -> R,
    {
        let mut seat = self.seats.get_mut(player)?;
        let result = match seat.value_mut() {
            Seat::Single(session) => Some(f(session)),
            Seat::Multi(_) => None,
        };
        result
    }

    /// Remove a session that has already been ended by its owner's move.
    pub fn remove_ended_single(&self, player: &PlayerId) -> Option<SingleGameSession> {
        let (_, seat) = self.seats.remove_if(player, |_, seat| {
            matches!(seat, Seat::Single(session) if !session.is_active())
        })?;
        match seat {
            Seat::Single(session) => Some(session),
            Seat::Multi(_) => None,
        }
    }

    /// Atomically remove a session if it is still active and out of time.
    pub fn take_expired_single(&self, player: &PlayerId, now: Instant) -> Option<SingleGameSession> {
        let (_, seat) = self.seats.remove_if(player, |_, seat| {
            matches!(seat, Seat::Single(session) if session.is_active() && session.is_expired(now))
        })?;
        match seat {
            Seat::Single(session) => Some(session),
            Seat::Multi(_) => None,
        }
    }

    /// Players currently in a single-player session
    pub fn single_players(&self) -> Vec<PlayerId> {
        self.seats
            .iter()
            .filter(|entry| matches!(entry.value(), Seat::Single(_)))
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn is_seated(&self, player: &PlayerId) -> bool {
        self.seats.contains_key(player)
    }

    /// The multiplayer game a player is in, if any.
    pub fn game_of(&self, player: &PlayerId) -> Option<GameId> {
        match self.seats.get(player)?.value() {
            Seat::Multi(id) => Some(id.clone()),
            Seat::Single(_) => None,
        }
    }

    /// Register a new game under a free id. Returns the game back when the
    /// id is taken.
    pub fn insert_game(&self, game: MultiplayerGame) -> Result<(), MultiplayerGame> {
        match self.games.entry(game.id().clone()) {
            Entry::Occupied(_) => Err(game),
            Entry::Vacant(entry) => {
                let game = entry.insert(game);
                for player in [game.player1(), game.player2()] {
                    self.pending
                        .entry(player.clone())
                        .or_default()
                        .push(game.id().clone());
                }
                Ok(())
            }
        }
    }

    /// The newest unjoined invitation `player` is part of.
    pub fn pending_game(&self, player: &PlayerId) -> Option<GameId> {
        self.pending.get(player)?.last().cloned()
    }

    /// Drop a game from both players' pending invitations.
    pub fn forget_invitation(&self, game: &MultiplayerGame) {
        for player in [game.player1(), game.player2()] {
            if let Entry::Occupied(mut entry) = self.pending.entry(player.clone()) {
                entry.get_mut().retain(|id| id != game.id());
                if entry.get().is_empty() {
                    entry.remove();
                }
            }
        }
    }

    /// Run `f` on a game while holding its lock.
    pub fn with_game<R, F>(&self, id: &GameId, f: F) -> Option<R>
    where
        F: FnOnce(&mut MultiplayerGame) -> R,
    {
        let mut game = self.games.get_mut(id)?;
        Some(f(game.value_mut()))
    }

    /// Seat both players of a game. Either both get seated or neither.
    pub fn seat_pair(&self, id: &GameId, a: &PlayerId, b: &PlayerId) -> Result<(), EngineError> {
        self.seat_multi(id, a)?;
        if let Err(e) = self.seat_multi(id, b) {
            self.unseat_multi(id, a);
            return Err(e);
        }
        Ok(())
    }

    fn seat_multi(&self, id: &GameId, player: &PlayerId) -> Result<(), EngineError> {
        match self.seats.entry(player.clone()) {
            Entry::Occupied(_) => Err(EngineError::AlreadyPlaying(player.clone())),
            Entry::Vacant(entry) => {
                entry.insert(Seat::Multi(id.clone()));
                Ok(())
            }
        }
    }

    /// Free a player's seat if it still points at `id`.
    pub fn unseat_multi(&self, id: &GameId, player: &PlayerId) {
        self.seats
            .remove_if(player, |_, seat| matches!(seat, Seat::Multi(seated) if seated == id));
    }

    /// Remove a game already ended by a move, freeing both seats.
    pub fn remove_ended_game(&self, id: &GameId) -> Option<MultiplayerGame> {
        let (_, game) = self
            .games
            .remove_if(id, |_, game| game.state() == GameState::Ended)?;
        self.release(&game);
        Some(game)
    }

    /// Atomically remove a game if it is still live and has stalled,
    /// freeing both seats.
    pub fn take_expired_game(
        &self,
        id: &GameId,
        now: Instant,
        turn_limit: Duration,
        invite_limit: Duration,
    ) -> Option<MultiplayerGame> {
        let (_, game) = self
            .games
            .remove_if(id, |_, game| game.is_expired(now, turn_limit, invite_limit))?;
        self.release(&game);
        Some(game)
    }

    fn release(&self, game: &MultiplayerGame) {
        self.unseat_multi(game.id(), game.player1());
        self.unseat_multi(game.id(), game.player2());
        self.forget_invitation(game);
    }

    /// Ids of all registered games
    pub fn game_ids(&self) -> Vec<GameId> {
        self.games.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn single_count(&self) -> usize {
        self.seats
            .iter()
            .filter(|entry| matches!(entry.value(), Seat::Single(_)))
            .count()
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }
}
