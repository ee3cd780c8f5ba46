//! What a move, a join or a timeout produces, for the transport to format

use super::difficulty::DifficultyProfile;
use super::rules::MoveError;
use super::{GameId, PlayerId};

/// Shown when the fact provider fails
pub const FACT_UNAVAILABLE: &str = "Не удалось получить информацию";

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The single player gave up
    Surrendered,
    /// One multiplayer participant gave up
    OpponentSurrendered,
    /// The player caught the scripted opponent playing a fake city
    CaughtCheating,
    /// The scripted opponent has no valid city left
    OpponentExhausted,
    /// The chain reached its maximum length
    CityLimit,
    /// Somebody took too long over a turn
    TimeExpired,
    /// Nobody joined an invitation in time
    InvitationExpired,
}

impl EndReason {
    pub fn message(&self) -> &'static str {
        match self {
            EndReason::Surrendered => "Вы сдались",
            EndReason::OpponentSurrendered => "игрок сдался",
            EndReason::CaughtCheating => "бот пойман на обмане",
            EndReason::OpponentExhausted => "у бота нет городов на эту букву",
            EndReason::CityLimit => "достигнут лимит городов",
            EndReason::TimeExpired => "время вышло",
            EndReason::InvitationExpired => "приглашение не принято",
        }
    }
}

/// Single-player result from the player's side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Win,
    Loss,
    Draw,
}

/// Single-player score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub player: u32,
    pub opponent: u32,
}

/// Final state of a single-player session
#[derive(Debug, Clone, PartialEq)]
pub struct SingleSummary {
    pub player: PlayerId,
    pub reason: EndReason,
    pub score: Score,
    pub verdict: Verdict,
    /// Last city in the chain when the game ended
    pub last_city: Option<String>,
}

/// Final state of a multiplayer game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSummary {
    pub game_id: GameId,
    pub player1: PlayerId,
    pub player2: PlayerId,
    pub score1: u32,
    pub score2: u32,
    /// `None` only when the game never started
    pub winner: Option<PlayerId>,
    pub reason: EndReason,
}

impl MultiSummary {
    pub fn loser(&self) -> Option<&PlayerId> {
        let winner = self.winner.as_ref()?;
        Some(if *winner == self.player1 {
            &self.player2
        } else {
            &self.player1
        })
    }
}

/// A finished game, whatever ended it. Move-driven and timeout-driven
/// endings produce the same shape.
#[derive(Debug, Clone, PartialEq)]
pub enum GameOver {
    Single(SingleSummary),
    Multi(MultiSummary),
}

impl GameOver {
    pub fn reason(&self) -> EndReason {
        match self {
            GameOver::Single(s) => s.reason,
            GameOver::Multi(m) => m.reason,
        }
    }

    /// Everyone who should hear about the ending
    pub fn recipients(&self) -> Vec<PlayerId> {
        match self {
            GameOver::Single(s) => vec![s.player.clone()],
            GameOver::Multi(m) => vec![m.player1.clone(), m.player2.clone()],
        }
    }
}

/// An accepted multiplayer move: the mover waits, the other player is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnHandoff {
    pub game_id: GameId,
    pub city: String,
    pub mover: PlayerId,
    pub next: PlayerId,
    /// Letter the next player must use
    pub required: Option<char>,
    /// Next player's own score
    pub next_score: u32,
    /// Mover's score, i.e. the next player's opponent
    pub mover_score: u32,
}

/// Result of one inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum MoveResult {
    /// Single player: city accepted and the opponent answered
    Replied {
        accepted: String,
        reply: String,
        required: Option<char>,
        score: Score,
    },
    /// Multiplayer: city accepted, turn passed on
    Passed(TurnHandoff),
    Rejected(MoveError),
    GameOver(GameOver),
    NotYourTurn,
    NoSession,
    /// Multiplayer game still waiting for the invitee
    NotStarted,
    Hints {
        letter: char,
        cities: Vec<String>,
    },
    NoHints,
    HintsDisabled,
    CityInfo {
        city: String,
        text: String,
        /// The player may answer with a challenge
        challengeable: bool,
    },
    /// Info requested before any city was named
    NothingPlayed,
    /// A challenge when the opponent did not cheat
    ChallengeRejected,
}

/// A state machine's answer before any external lookup is done.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Done(MoveResult),
    /// Ask the fact provider about `city`; `fabricated` asks for an invented fact
    LookupFact { city: String, fabricated: bool },
}

/// First move of a single-player session
#[derive(Debug, Clone, PartialEq)]
pub struct SingleOpening {
    pub city: String,
    pub required: Option<char>,
    pub difficulty: DifficultyProfile,
}

/// Opening of a multiplayer game, sent to both participants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOpening {
    pub game_id: GameId,
    pub city: String,
    pub required: Option<char>,
    pub turn_owner: PlayerId,
    pub player1: PlayerId,
    pub player2: PlayerId,
}
