//! Win/loss statistics
//!
//! Kept in memory for the lifetime of the process. Every finished game is
//! recorded exactly once by whoever ended it (a move or the supervisor).

use crate::game::{GameOver, PlayerId, Verdict};
use dashmap::DashMap;

/// A player's record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStats {
    pub wins: u32,
    pub losses: u32,
}

impl PlayerStats {
    /// Games that produced a winner
    pub fn decided(&self) -> u32 {
        self.wins + self.losses
    }
}

/// Stats tracker shared by all games
#[derive(Debug, Default)]
pub struct StatsBook {
    stats: DashMap<PlayerId, PlayerStats>,
}

impl StatsBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// A player's record; zeros for players never seen.
    pub fn get(&self, player: &PlayerId) -> PlayerStats {
        self.stats.get(player).map(|s| *s).unwrap_or_default()
    }

    pub fn record_win(&self, player: &PlayerId) {
        self.stats.entry(player.clone()).or_default().wins += 1;
    }

    pub fn record_loss(&self, player: &PlayerId) {
        self.stats.entry(player.clone()).or_default().losses += 1;
    }

    /// Credit a finished game. Draws and expired invitations change nothing.
    pub fn record(&self, over: &GameOver) {
        match over {
            GameOver::Single(summary) => match summary.verdict {
                Verdict::Win => self.record_win(&summary.player),
                Verdict::Loss => self.record_loss(&summary.player),
                Verdict::Draw => {}
            },
            GameOver::Multi(summary) => {
                if let (Some(winner), Some(loser)) = (summary.winner.as_ref(), summary.loser()) {
                    self.record_win(winner);
                    self.record_loss(loser);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{EndReason, GameId, MultiSummary, Score, SingleSummary};

    fn single(verdict: Verdict) -> GameOver {
        GameOver::Single(SingleSummary {
            player: PlayerId::from("solo"),
            reason: EndReason::CityLimit,
            score: Score::default(),
            verdict,
            last_city: None,
        })
    }

    fn multi(winner: Option<&str>) -> GameOver {
        GameOver::Multi(MultiSummary {
            game_id: GameId::from("1234"),
            player1: PlayerId::from("alice"),
            player2: PlayerId::from("bob"),
            score1: 1,
            score2: 0,
            winner: winner.map(PlayerId::from),
            reason: EndReason::TimeExpired,
        })
    }

    #[test]
    fn test_unseen_player_has_zeros() {
        let book = StatsBook::new();
        assert_eq!(book.get(&PlayerId::from("ghost")), PlayerStats::default());
    }

    #[test]
    fn test_single_verdicts() {
        let book = StatsBook::new();
        book.record(&single(Verdict::Win));
        book.record(&single(Verdict::Loss));
        book.record(&single(Verdict::Loss));
        book.record(&single(Verdict::Draw));

        let stats = book.get(&PlayerId::from("solo"));
        assert_eq!(stats, PlayerStats { wins: 1, losses: 2 });
        assert_eq!(stats.decided(), 3);
    }

    #[test]
    fn test_multi_is_symmetric() {
        let book = StatsBook::new();
        book.record(&multi(Some("bob")));
        assert_eq!(book.get(&PlayerId::from("bob")), PlayerStats { wins: 1, losses: 0 });
        assert_eq!(book.get(&PlayerId::from("alice")), PlayerStats { wins: 0, losses: 1 });

        // No winner, no change
        book.record(&multi(None));
        assert_eq!(book.get(&PlayerId::from("alice")).decided(), 1);
    }
}
