//! Two-player game
//!
//! The inviter creates the game, the invitee joins it and moves first.
//! Players alternate strictly; only cities from the real catalog count.

use super::catalog::CityCatalog;
use super::chain::ChainState;
use super::command::Command;
use super::outcome::{
    EndReason, GameOver, JoinOpening, MoveResult, MultiSummary, Submission, TurnHandoff,
};
use super::random::RandomSource;
use super::rules::validate_city;
use super::{GameId, GameRules, PlayerId};
use crate::error::EngineError;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Lifecycle of a multiplayer game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    AwaitingJoin,
    Active,
    Ended,
}

/// Who wins when the city limit ends a game with equal scores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    /// The inviter wins ties
    Player1,
}

/// Tie-break applied at the city limit
pub const TIE_BREAK: TieBreak = TieBreak::Player1;

/// One match between two players.
#[derive(Debug, Clone)]
pub struct MultiplayerGame {
    id: GameId,
    player1: PlayerId,
    player2: PlayerId,
    chain: ChainState,
    scores: HashMap<PlayerId, u32>,
    current_turn: PlayerId,
    created_at: Instant,
    last_move_at: Instant,
    state: GameState,
}

impl MultiplayerGame {
    /// A fresh invitation. The invitee will move first.
    pub fn invite(id: GameId, player1: PlayerId, player2: PlayerId, now: Instant) -> Self {
        let mut scores = HashMap::new();
        scores.insert(player1.clone(), 0);
        scores.insert(player2.clone(), 0);

        Self {
            id,
            current_turn: player2.clone(),
            player1,
            player2,
            chain: ChainState::new(),
            scores,
            created_at: now,
            last_move_at: now,
            state: GameState::AwaitingJoin,
        }
    }

    /// Check that `player` may join, without changing anything.
    pub fn check_join(&self, player: &PlayerId) -> Result<(), EngineError> {
        if *player != self.player2 {
            return Err(EngineError::NotInvitee {
                game: self.id.clone(),
                player: player.clone(),
            });
        }
        if self.state != GameState::AwaitingJoin {
            return Err(EngineError::AlreadyStarted(self.id.clone()));
        }
        Ok(())
    }

    /// Start the game with a random, uncredited opening city.
    pub fn join(
        &mut self,
        player: &PlayerId,
        catalog: &CityCatalog,
        rng: &dyn RandomSource,
        now: Instant,
    ) -> Result<JoinOpening, EngineError> {
        self.check_join(player)?;
        let city = catalog
            .random_city(rng)
            .ok_or(EngineError::EmptyCatalog)?
            .to_string();

        self.chain.push(city.clone());
        self.state = GameState::Active;
        self.last_move_at = now;

        Ok(JoinOpening {
            game_id: self.id.clone(),
            required: self.chain.required_letter(),
            city,
            turn_owner: self.current_turn.clone(),
            player1: self.player1.clone(),
            player2: self.player2.clone(),
        })
    }

    /// Handle one parsed input from `player`.
    pub fn submit(
        &mut self,
        player: &PlayerId,
        command: Command,
        catalog: &CityCatalog,
        rules: &GameRules,
        now: Instant,
    ) -> Submission {
        match self.state {
            GameState::AwaitingJoin => return Submission::Done(MoveResult::NotStarted),
            GameState::Ended => return Submission::Done(MoveResult::NoSession),
            GameState::Active => {}
        }
        if *player != self.current_turn {
            return Submission::Done(MoveResult::NotYourTurn);
        }

        let result = match command {
            Command::Surrender => {
                let winner = self.other(player).clone();
                self.finish(EndReason::OpponentSurrendered, Some(winner))
            }
            Command::CityInfo => {
                return match self.chain.last() {
                    Some(city) => Submission::LookupFact {
                        city: city.to_string(),
                        fabricated: false,
                    },
                    None => Submission::Done(MoveResult::NothingPlayed),
                };
            }
            // No scripted opponent here: nothing to hint at, nobody to catch
            Command::Hint => MoveResult::HintsDisabled,
            Command::Challenge => MoveResult::ChallengeRejected,
            Command::Guess(text) => self.play(player, &text, catalog, rules, now),
        };
        Submission::Done(result)
    }

    fn play(
        &mut self,
        player: &PlayerId,
        guess: &str,
        catalog: &CityCatalog,
        rules: &GameRules,
        now: Instant,
    ) -> MoveResult {
        let city = match validate_city(guess, &self.chain, |g| catalog.resolve_known(g)) {
            Ok(city) => city,
            Err(e) => return MoveResult::Rejected(e),
        };

        self.chain.push(city.clone());
        self.chain.count_turn();
        *self.scores.entry(player.clone()).or_insert(0) += 1;
        self.last_move_at = now;

        if self.chain.len() >= rules.max_cities {
            let winner = self.limit_winner().clone();
            return self.finish(EndReason::CityLimit, Some(winner));
        }

        let next = self.other(player).clone();
        self.current_turn = next.clone();

        MoveResult::Passed(TurnHandoff {
            game_id: self.id.clone(),
            required: self.chain.required_letter(),
            city,
            mover: player.clone(),
            next_score: self.score_of(&next),
            mover_score: self.score_of(player),
            next,
        })
    }

    /// Higher score wins; a tie goes by [`TIE_BREAK`].
    pub fn limit_winner(&self) -> &PlayerId {
        let p1 = self.score_of(&self.player1);
        let p2 = self.score_of(&self.player2);
        match p1.cmp(&p2) {
            std::cmp::Ordering::Greater => &self.player1,
            std::cmp::Ordering::Less => &self.player2,
            std::cmp::Ordering::Equal => match TIE_BREAK {
                TieBreak::Player1 => &self.player1,
            },
        }
    }

    /// Move the game to `Ended`. Only the first call yields a summary.
    pub fn end(&mut self, reason: EndReason, winner: Option<PlayerId>) -> Option<MultiSummary> {
        if self.state == GameState::Ended {
            return None;
        }
        self.state = GameState::Ended;
        Some(MultiSummary {
            game_id: self.id.clone(),
            player1: self.player1.clone(),
            player2: self.player2.clone(),
            score1: self.score_of(&self.player1),
            score2: self.score_of(&self.player2),
            winner,
            reason,
        })
    }

    fn finish(&mut self, reason: EndReason, winner: Option<PlayerId>) -> MoveResult {
        match self.end(reason, winner) {
            Some(summary) => MoveResult::GameOver(GameOver::Multi(summary)),
            None => MoveResult::NoSession,
        }
    }

    /// Whether the game has stalled: an active turn older than `turn_limit`,
    /// or an invitation nobody accepted within `invite_limit`.
    pub fn is_expired(&self, now: Instant, turn_limit: Duration, invite_limit: Duration) -> bool {
        match self.state {
            GameState::Active => now.saturating_duration_since(self.last_move_at) > turn_limit,
            GameState::AwaitingJoin => now.saturating_duration_since(self.created_at) > invite_limit,
            GameState::Ended => false,
        }
    }

    /// End a stalled game: the player not on turn wins a timed-out game,
    /// nobody wins an expired invitation.
    pub fn expire(&mut self) -> Option<MultiSummary> {
        match self.state {
            GameState::Active => {
                let winner = self.other(&self.current_turn).clone();
                self.end(EndReason::TimeExpired, Some(winner))
            }
            GameState::AwaitingJoin => self.end(EndReason::InvitationExpired, None),
            GameState::Ended => None,
        }
    }

    /// The opponent of `player`.
    pub fn other(&self, player: &PlayerId) -> &PlayerId {
        if *player == self.player1 {
            &self.player2
        } else {
            &self.player1
        }
    }

    pub fn score_of(&self, player: &PlayerId) -> u32 {
        self.scores.get(player).copied().unwrap_or(0)
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn player1(&self) -> &PlayerId {
        &self.player1
    }

    pub fn player2(&self) -> &PlayerId {
        &self.player2
    }

    pub fn current_turn(&self) -> &PlayerId {
        &self.current_turn
    }

    pub fn chain(&self) -> &ChainState {
        &self.chain
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == GameState::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::FAKE_CITIES;
    use crate::game::random::ScriptedRandom;
    use crate::game::rules::MoveError;
    use crate::game::MAX_CITIES_IN_GAME;

    fn catalog() -> CityCatalog {
        CityCatalog::from_names(
            ["Москва", "Астрахань", "Нальчик", "Назрань", "Кострома", "Абакан", "Норильск"],
            FAKE_CITIES,
        )
    }

    fn alice() -> PlayerId {
        PlayerId::from("alice")
    }

    fn bob() -> PlayerId {
        PlayerId::from("bob")
    }

    /// Started game with opening "Москва", bob to move.
    fn started() -> MultiplayerGame {
        let mut game = MultiplayerGame::invite(GameId::from("1234"), alice(), bob(), Instant::now());
        let rng = ScriptedRandom::new().with_picks([0]);
        game.join(&bob(), &catalog(), &rng, Instant::now()).unwrap();
        game
    }

    fn send(game: &mut MultiplayerGame, player: &PlayerId, text: &str) -> MoveResult {
        match game.submit(player, Command::parse(text), &catalog(), &GameRules::default(), Instant::now()) {
            Submission::Done(result) => result,
            other => panic!("Expected a finished submission, got {:?}", other),
        }
    }

    #[test]
    fn test_invite_gives_first_turn_to_invitee() {
        let game = MultiplayerGame::invite(GameId::from("1234"), alice(), bob(), Instant::now());
        assert_eq!(game.state(), GameState::AwaitingJoin);
        assert_eq!(game.current_turn(), &bob());
        assert!(game.chain().is_empty());
    }

    #[test]
    fn test_join_checks() {
        let mut game = MultiplayerGame::invite(GameId::from("1234"), alice(), bob(), Instant::now());
        let rng = ScriptedRandom::new();

        assert!(matches!(
            game.join(&alice(), &catalog(), &rng, Instant::now()),
            Err(EngineError::NotInvitee { .. })
        ));

        let opening = game.join(&bob(), &catalog(), &rng, Instant::now()).unwrap();
        assert_eq!(opening.city, "Москва");
        assert_eq!(opening.required, Some('а'));
        assert_eq!(opening.turn_owner, bob());
        // The opening city is nobody's point
        assert_eq!(game.score_of(&alice()), 0);
        assert_eq!(game.score_of(&bob()), 0);

        assert!(matches!(
            game.join(&bob(), &catalog(), &rng, Instant::now()),
            Err(EngineError::AlreadyStarted(_))
        ));
    }

    #[test]
    fn test_moves_before_join() {
        let mut game = MultiplayerGame::invite(GameId::from("1234"), alice(), bob(), Instant::now());
        assert_eq!(send(&mut game, &bob(), "Астрахань"), MoveResult::NotStarted);
    }

    #[test]
    fn test_turns_alternate_strictly() {
        let mut game = started();

        assert_eq!(send(&mut game, &alice(), "Астрахань"), MoveResult::NotYourTurn);
        assert_eq!(game.current_turn(), &bob());

        match send(&mut game, &bob(), "астрахань") {
            MoveResult::Passed(handoff) => {
                assert_eq!(handoff.city, "Астрахань");
                assert_eq!(handoff.mover, bob());
                assert_eq!(handoff.next, alice());
                assert_eq!(handoff.required, Some('н'));
                assert_eq!(handoff.next_score, 0);
                assert_eq!(handoff.mover_score, 1);
            }
            other => panic!("Expected Passed, got {:?}", other),
        }
        assert_eq!(game.current_turn(), &alice());

        // A rejected move keeps the turn
        assert_eq!(
            send(&mut game, &alice(), "Кострома"),
            MoveResult::Rejected(MoveError::WrongLetter { required: 'н' })
        );
        assert_eq!(game.current_turn(), &alice());

        assert!(matches!(send(&mut game, &alice(), "Нальчик"), MoveResult::Passed(_)));
        assert_eq!(game.current_turn(), &bob());
    }

    #[test]
    fn test_fakes_are_not_valid_in_multiplayer() {
        let mut game = started();
        assert_eq!(
            send(&mut game, &bob(), "Алгоритмск"),
            MoveResult::Rejected(MoveError::UnknownCity)
        );
    }

    #[test]
    fn test_surrender_credits_other_player() {
        let mut game = started();
        match send(&mut game, &bob(), "🏳 Сдаться") {
            MoveResult::GameOver(GameOver::Multi(summary)) => {
                assert_eq!(summary.reason, EndReason::OpponentSurrendered);
                assert_eq!(summary.winner, Some(alice()));
                assert_eq!(summary.loser(), Some(&bob()));
            }
            other => panic!("Expected GameOver, got {:?}", other),
        }
        assert_eq!(game.state(), GameState::Ended);
        assert_eq!(send(&mut game, &bob(), "Астрахань"), MoveResult::NoSession);
    }

    #[test]
    fn test_city_info_and_hints() {
        let mut game = started();
        let info = game.submit(&bob(), Command::CityInfo, &catalog(), &GameRules::default(), Instant::now());
        assert_eq!(
            info,
            Submission::LookupFact {
                city: "Москва".to_string(),
                fabricated: false
            }
        );
        assert_eq!(send(&mut game, &bob(), "подсказка"), MoveResult::HintsDisabled);
    }

    #[test]
    fn test_limit_winner_by_score() {
        let mut game = started();
        game.scores.insert(alice(), 120);
        game.scores.insert(bob(), 80);
        assert_eq!(game.limit_winner(), &alice());

        game.scores.insert(bob(), 121);
        assert_eq!(game.limit_winner(), &bob());
    }

    #[test]
    fn test_limit_tie_goes_to_player1() {
        let mut game = started();
        game.scores.insert(alice(), 100);
        game.scores.insert(bob(), 100);
        assert_eq!(game.limit_winner(), &alice());
    }

    #[test]
    fn test_city_limit_ends_game() {
        let mut game = started();
        let rules = GameRules {
            max_cities: 2,
            ..GameRules::default()
        };
        let result = game.submit(
            &bob(),
            Command::parse("Астрахань"),
            &catalog(),
            &rules,
            Instant::now(),
        );
        match result {
            Submission::Done(MoveResult::GameOver(GameOver::Multi(summary))) => {
                assert_eq!(summary.reason, EndReason::CityLimit);
                assert_eq!(summary.score2, 1);
                assert_eq!(summary.winner, Some(bob()));
            }
            other => panic!("Expected city limit, got {:?}", other),
        }
    }

    /// Started game one city short of the default cap, bob to move on "А".
    fn one_short_of_cap(alice_score: u32, bob_score: u32) -> MultiplayerGame {
        let mut game = started();
        let mut chain = ChainState::new();
        for i in 1..GameRules::default().max_cities - 1 {
            chain.push(format!("Город{}", i));
        }
        chain.push("Москва".to_string());
        assert_eq!(chain.len(), MAX_CITIES_IN_GAME - 1);
        game.chain = chain;
        game.scores.insert(alice(), alice_score);
        game.scores.insert(bob(), bob_score);
        game
    }

    #[test]
    fn test_default_cap_ends_game_by_score() {
        let mut game = one_short_of_cap(120, 79);
        match send(&mut game, &bob(), "Астрахань") {
            MoveResult::GameOver(GameOver::Multi(summary)) => {
                assert_eq!(summary.reason, EndReason::CityLimit);
                assert_eq!((summary.score1, summary.score2), (120, 80));
                assert_eq!(summary.winner, Some(alice()));
                assert_eq!(summary.loser(), Some(&bob()));
            }
            other => panic!("Expected city limit, got {:?}", other),
        }
        assert_eq!(game.chain().len(), MAX_CITIES_IN_GAME);
        assert_eq!(game.state(), GameState::Ended);
    }

    #[test]
    fn test_default_cap_tie_goes_to_player1() {
        let mut game = one_short_of_cap(100, 99);
        match send(&mut game, &bob(), "Астрахань") {
            MoveResult::GameOver(GameOver::Multi(summary)) => {
                assert_eq!(summary.reason, EndReason::CityLimit);
                assert_eq!((summary.score1, summary.score2), (100, 100));
                assert_eq!(summary.winner, Some(alice()));
            }
            other => panic!("Expected city limit, got {:?}", other),
        }
    }

    #[test]
    fn test_expiry() {
        let start = Instant::now();
        let limit = Duration::from_secs(120);
        let mut pending = MultiplayerGame::invite(GameId::from("1"), alice(), bob(), start);
        assert!(!pending.is_expired(start + limit, limit, limit));
        assert!(pending.is_expired(start + limit + Duration::from_secs(1), limit, limit));
        let summary = pending.expire().unwrap();
        assert_eq!(summary.reason, EndReason::InvitationExpired);
        assert_eq!(summary.winner, None);
        assert!(pending.expire().is_none());

        let mut game = started();
        let later = Instant::now() + limit + Duration::from_secs(1);
        assert!(game.is_expired(later, limit, limit));
        let summary = game.expire().unwrap();
        assert_eq!(summary.reason, EndReason::TimeExpired);
        // bob was on turn and stalled
        assert_eq!(summary.winner, Some(alice()));
        assert!(!game.is_expired(later, limit, limit));
    }
}
