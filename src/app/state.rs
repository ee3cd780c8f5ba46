//! Game screen state

use goroda::game::rules::upper;
use goroda::game::{
    DifficultyProfile, EndReason, GameOver, MoveResult, Score, SingleOpening, SingleSummary,
    Verdict,
};
use std::collections::VecDeque;

/// Most chain entries kept on screen
const LOG_CAPACITY: usize = 12;

/// Who named a city
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Player,
    Opponent,
}

/// One line of the chain log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEntry {
    pub speaker: Speaker,
    pub city: String,
}

/// State of the game in progress, as the player sees it
pub struct App {
    pub difficulty: DifficultyProfile,
    /// Current user input
    pub input: String,
    /// Reply to the last submission
    pub feedback: String,
    pub score: Score,
    /// Letter the next city must start with
    pub required: Option<char>,
    /// Seconds left on this turn, for display only
    pub time_remaining: u64,
    /// Latest hint list, cleared on the next accepted city
    pub hints: Vec<String>,
    /// Recent cities, oldest first
    pub log: VecDeque<ChainEntry>,
    /// Set once the engine reports the game over
    pub summary: Option<SingleSummary>,
}

impl App {
    /// Fresh game screen showing the opponent's opening city
    pub fn new(opening: SingleOpening) -> Self {
        let mut app = Self {
            difficulty: opening.difficulty,
            input: String::new(),
            feedback: format!(
                "Уровень: {}. {}",
                opening.difficulty.name, opening.difficulty.description
            ),
            score: Score {
                player: 0,
                opponent: 1,
            },
            required: opening.required,
            time_remaining: opening.difficulty.turn_seconds,
            hints: Vec::new(),
            log: VecDeque::new(),
            summary: None,
        };
        app.push_log(Speaker::Opponent, opening.city);
        app
    }

    pub fn on_char(&mut self, c: char) {
        if self.is_over() {
            return;
        }
        self.input.push(c);
    }

    pub fn on_backspace(&mut self) {
        if self.is_over() {
            return;
        }
        self.input.pop();
    }

    /// Take the typed line for submission. Blank lines stay in the box.
    pub fn take_input(&mut self) -> Option<String> {
        if self.is_over() || self.input.trim().is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.input))
    }

    /// Count the turn clock down by one second
    pub fn tick(&mut self) {
        self.time_remaining = self.time_remaining.saturating_sub(1);
    }

    pub fn is_over(&self) -> bool {
        self.summary.is_some()
    }

    /// Show the engine's answer to a submission
    pub fn apply(&mut self, result: MoveResult) {
        match result {
            MoveResult::Replied {
                accepted,
                reply,
                required,
                score,
            } => {
                self.feedback = format!("Принято: {}. Мой город: {}", accepted, reply);
                self.push_log(Speaker::Player, accepted);
                self.push_log(Speaker::Opponent, reply);
                self.required = required;
                self.score = score;
                self.hints.clear();
                self.time_remaining = self.difficulty.turn_seconds;
            }
            MoveResult::Rejected(e) => self.feedback = e.message(),
            MoveResult::GameOver(over) => self.finish(over),
            MoveResult::Hints { letter, cities } => {
                self.feedback = format!("Города на букву {}:", upper(letter));
                self.hints = cities;
            }
            MoveResult::NoHints => self.feedback = "Нет доступных подсказок".to_string(),
            MoveResult::HintsDisabled => {
                self.feedback = "Подсказки доступны только на лёгком уровне".to_string()
            }
            MoveResult::CityInfo {
                city,
                text,
                challengeable,
            } => {
                self.feedback = if challengeable {
                    format!("{}: {} (если города нет, напишите «фейк»)", city, text)
                } else {
                    format!("{}: {}", city, text)
                };
            }
            MoveResult::NothingPlayed => self.feedback = "Еще нет названных городов".to_string(),
            MoveResult::ChallengeRejected => {
                self.feedback = "Это реальный город! Продолжайте игру".to_string()
            }
            MoveResult::NoSession => self.feedback = "Игра уже закончена".to_string(),
            MoveResult::NotYourTurn | MoveResult::NotStarted | MoveResult::Passed(_) => {}
        }
    }

    /// Record the end of the game, whether a move or the clock ended it
    pub fn finish(&mut self, over: GameOver) {
        if let GameOver::Single(summary) = over {
            self.feedback = game_over_line(&summary);
            self.summary = Some(summary);
        }
    }

    fn push_log(&mut self, speaker: Speaker, city: String) {
        self.log.push_back(ChainEntry { speaker, city });
        while self.log.len() > LOG_CAPACITY {
            self.log.pop_front();
        }
    }
}

/// One-line verdict for the game-over screen
pub fn game_over_line(summary: &SingleSummary) -> String {
    let headline = match (summary.reason, summary.verdict) {
        (EndReason::CaughtCheating, _) => "Вы поймали бота на обмане! Победа за вами!",
        (EndReason::OpponentExhausted, _) => "Вы победили! У меня нет городов на эту букву.",
        (_, Verdict::Win) => "Вы победили!",
        (_, Verdict::Loss) => "Вы проиграли.",
        (_, Verdict::Draw) => "Ничья.",
    };
    format!(
        "{} ({}) Счет: {}-{}",
        headline,
        summary.reason.message(),
        summary.score.player,
        summary.score.opponent
    )
}
