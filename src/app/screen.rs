//! Application screen state management
//!
//! Handles transitions between the difficulty menu and a game in progress.
//! A finished game stays on screen until the player presses Enter.

use super::state::App;
use goroda::game::difficulty::PROFILES;
use goroda::game::{DifficultyProfile, EndReason};
use goroda::{Engine, GameOver, PlayerId, StatsReport};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use tracing::debug;

/// Menu option on the main screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuOption {
    Play(DifficultyProfile),
    Stats,
    Quit,
}

impl MenuOption {
    /// All menu options in order: one per difficulty, then stats and quit
    pub fn all() -> Vec<MenuOption> {
        PROFILES
            .iter()
            .copied()
            .map(MenuOption::Play)
            .chain([MenuOption::Stats, MenuOption::Quit])
            .collect()
    }

    pub fn label(&self) -> String {
        match self {
            MenuOption::Play(profile) => format!("Играть: {}", profile.name),
            MenuOption::Stats => "Статистика".to_string(),
            MenuOption::Quit => "Выход".to_string(),
        }
    }
}

/// The current application screen
pub enum Screen {
    /// Main menu
    Menu {
        selected: usize,
        /// Stats or an error from the last selection
        notice: Option<String>,
    },
    /// A game in progress or just finished
    Playing { app: App },
}

/// Main application coordinator
pub struct AppCoordinator {
    pub screen: Screen,
    pub should_quit: bool,
    pub player: PlayerId,
    engine: Arc<Engine>,
    /// Games ended by the timeout supervisor
    notifications: Receiver<GameOver>,
}

impl AppCoordinator {
    pub fn new(engine: Arc<Engine>, player: PlayerId, notifications: Receiver<GameOver>) -> Self {
        Self {
            screen: Screen::Menu {
                selected: 0,
                notice: None,
            },
            should_quit: false,
            player,
            engine,
            notifications,
        }
    }

    /// Quit the application. Leaving a running game counts as giving up.
    pub fn quit(&mut self) {
        if let Screen::Playing { app } = &self.screen {
            if !app.is_over() {
                self.engine.end_single(&self.player, EndReason::Surrendered);
            }
        }
        self.should_quit = true;
    }

    pub fn go_to_menu(&mut self, notice: Option<String>) {
        self.screen = Screen::Menu {
            selected: 0,
            notice,
        };
    }

    pub fn on_up(&mut self) {
        if let Screen::Menu { selected, .. } = &mut self.screen {
            let count = MenuOption::all().len();
            *selected = (*selected + count - 1) % count;
        }
    }

    pub fn on_down(&mut self) {
        if let Screen::Menu { selected, .. } = &mut self.screen {
            *selected = (*selected + 1) % MenuOption::all().len();
        }
    }

    pub fn on_char(&mut self, c: char) {
        if let Screen::Playing { app } = &mut self.screen {
            app.on_char(c);
        }
    }

    pub fn on_backspace(&mut self) {
        if let Screen::Playing { app } = &mut self.screen {
            app.on_backspace();
        }
    }

    /// Select a menu entry, submit a line, or leave a finished game
    pub fn on_enter(&mut self) {
        match &mut self.screen {
            Screen::Menu { selected, .. } => {
                let option = MenuOption::all().get(*selected).copied();
                match option {
                    Some(MenuOption::Play(profile)) => self.start_game(profile),
                    Some(MenuOption::Stats) => {
                        let notice = stats_line(&self.engine.stats(&self.player));
                        self.go_to_menu(Some(notice));
                    }
                    Some(MenuOption::Quit) => self.quit(),
                    None => {}
                }
            }
            Screen::Playing { app } => {
                if app.is_over() {
                    self.go_to_menu(None);
                } else if let Some(line) = app.take_input() {
                    let result = self.engine.submit(&self.player, &line);
                    app.apply(result);
                }
            }
        }
    }

    /// Advance the turn countdown shown on screen
    pub fn tick(&mut self) {
        if let Screen::Playing { app } = &mut self.screen {
            if !app.is_over() {
                app.tick();
            }
        }
    }

    /// Apply endings reported by the timeout supervisor
    pub fn poll_notifications(&mut self) {
        while let Ok(over) = self.notifications.try_recv() {
            if !over.recipients().contains(&self.player) {
                continue;
            }
            debug!(reason = ?over.reason(), "game ended in the background");
            if let Screen::Playing { app } = &mut self.screen {
                app.finish(over);
            }
        }
    }

    fn start_game(&mut self, profile: DifficultyProfile) {
        match self.engine.start_single(&self.player, profile.id) {
            Ok(opening) => {
                self.screen = Screen::Playing {
                    app: App::new(opening),
                }
            }
            Err(e) => self.go_to_menu(Some(e.to_string())),
        }
    }
}

/// Stats screen line
pub fn stats_line(report: &StatsReport) -> String {
    format!(
        "Побед: {}  Поражений: {}  Городов в базе: {}",
        report.stats.wins, report.stats.losses, report.catalog_size
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use goroda::game::catalog::FAKE_CITIES;
    use goroda::game::random::ScriptedRandom;
    use goroda::game::CityCatalog;
    use goroda::EngineConfig;
    use std::sync::mpsc::{self, Sender};

    fn coordinator() -> (AppCoordinator, Sender<GameOver>) {
        let engine = Engine::new(
            EngineConfig::default(),
            CityCatalog::from_names(["Москва", "Астрахань", "Нальчик"], FAKE_CITIES),
        )
        .with_random(Arc::new(ScriptedRandom::new()));
        let (tx, rx) = mpsc::channel();
        let app = AppCoordinator::new(Arc::new(engine), PlayerId::from("alice"), rx);
        (app, tx)
    }

    fn type_line(app: &mut AppCoordinator, text: &str) {
        for c in text.chars() {
            app.on_char(c);
        }
        app.on_enter();
    }

    #[test]
    fn test_menu_wraps() {
        let (mut app, _tx) = coordinator();
        app.on_up();
        match &app.screen {
            Screen::Menu { selected, .. } => assert_eq!(*selected, MenuOption::all().len() - 1),
            Screen::Playing { .. } => panic!("expected menu"),
        }
        app.on_down();
        match &app.screen {
            Screen::Menu { selected, .. } => assert_eq!(*selected, 0),
            Screen::Playing { .. } => panic!("expected menu"),
        }
    }

    #[test]
    fn test_play_a_turn() {
        let (mut app, _tx) = coordinator();
        app.on_enter();
        type_line(&mut app, "астрахань");

        match &app.screen {
            Screen::Playing { app } => {
                assert_eq!(app.log.len(), 3);
                assert_eq!(app.score.player, 1);
                assert_eq!(app.required, Some('к'));
            }
            Screen::Menu { .. } => panic!("expected a game"),
        }
    }

    #[test]
    fn test_surrender_then_back_to_menu() {
        let (mut app, _tx) = coordinator();
        app.on_enter();
        type_line(&mut app, "сдаться");
        assert!(matches!(&app.screen, Screen::Playing { app } if app.is_over()));

        app.on_enter();
        assert!(matches!(app.screen, Screen::Menu { .. }));
    }

    #[test]
    fn test_stats_notice() {
        let (mut app, _tx) = coordinator();
        app.on_down();
        app.on_down();
        app.on_down();
        app.on_enter();
        match &app.screen {
            Screen::Menu { notice, .. } => assert_eq!(
                notice.as_deref(),
                Some("Побед: 0  Поражений: 0  Городов в базе: 3")
            ),
            Screen::Playing { .. } => panic!("expected menu"),
        }
    }

    #[test]
    fn test_quit_mid_game_counts_as_loss() {
        let (mut app, _tx) = coordinator();
        app.on_enter();
        app.quit();
        assert!(app.should_quit);
        assert_eq!(app.engine.stats(&app.player).stats.losses, 1);
    }

    #[test]
    fn test_background_timeout_ends_game() {
        let (mut app, tx) = coordinator();
        app.on_enter();
        let summary = app
            .engine
            .end_single(&app.player, EndReason::TimeExpired)
            .unwrap();
        tx.send(summary).unwrap();

        app.poll_notifications();
        assert!(matches!(&app.screen, Screen::Playing { app } if app.is_over()));
    }
}
