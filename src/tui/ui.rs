//! UI rendering using ratatui
//!
//! Two screens:
//! - Menu: difficulty choice, stats, quit
//! - Playing: chain log, input line, score and turn timer; the game-over
//!   summary replaces the input once the game ends

use crate::app::{App, AppCoordinator, MenuOption, Screen, Speaker};
use goroda::game::rules::upper;
use goroda::game::Verdict;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, coordinator: &AppCoordinator) {
    match &coordinator.screen {
        Screen::Menu { selected, notice } => {
            render_menu(frame, *selected, coordinator.player.as_str(), notice.as_deref());
        }
        Screen::Playing { app } => render_game(frame, app),
    }
}

/// Render the main menu
fn render_menu(frame: &mut Frame, selected: usize, player: &str, notice: Option<&str>) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Logo
            Constraint::Length(2), // Player
            Constraint::Min(6),    // Menu options
            Constraint::Length(2), // Notice
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let logo = r#"
  ____  ___  ____   ___  ____    _
 / ___|/ _ \|  _ \ / _ \|  _ \  / \
| |  _| | | | |_) | | | | | | |/ _ \
| |_| | |_| |  _ <| |_| | |_| / ___ \
 \____|\___/|_| \_\\___/|____/_/   \_\
"#;
    let logo_widget = Paragraph::new(logo)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo_widget, layout[0]);

    let player_widget = Paragraph::new(format!("Игрок: {}", player))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(player_widget, layout[1]);

    let items: Vec<ListItem> = MenuOption::all()
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == selected { "> " } else { "  " };
            ListItem::new(format!("{}{}", prefix, opt.label())).style(style)
        })
        .collect();
    frame.render_widget(List::new(items).block(Block::default()), layout[2]);

    if let Some(notice) = notice {
        let notice_widget = Paragraph::new(notice)
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center);
        frame.render_widget(notice_widget, layout[3]);
    }

    let footer = Paragraph::new("↑↓ Выбор  Enter Подтвердить  Esc Выход")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[4]);
}

/// Render the in-game screen
fn render_game(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with letter, timer
            Constraint::Min(0),    // Main content area
        ])
        .split(area);

    render_header(frame, layout[0], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(30),    // Input or summary
            Constraint::Length(28), // Chain log
        ])
        .split(layout[1]);

    if app.is_over() {
        render_game_over(frame, columns[0], app);
    } else {
        render_input_area(frame, columns[0], app);
    }
    render_chain(frame, columns[1], app);
}

/// Render the header: difficulty, required letter, timer
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14), // Difficulty
            Constraint::Min(20),    // Required letter
            Constraint::Length(10), // Timer
        ])
        .split(inner);

    let difficulty = Paragraph::new(app.difficulty.name)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Left);
    frame.render_widget(difficulty, header_layout[0]);

    let letter = Paragraph::new(format_required(app.required))
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center);
    frame.render_widget(letter, header_layout[1]);

    let timer_color = if app.time_remaining <= 10 {
        Color::Red
    } else if app.time_remaining <= 30 {
        Color::Yellow
    } else {
        Color::Green
    };
    let timer = Paragraph::new(format_timer(app.time_remaining))
        .style(Style::default().fg(timer_color).bold())
        .alignment(Alignment::Right);
    frame.render_widget(timer, header_layout[2]);
}

/// Render the input/feedback area
fn render_input_area(frame: &mut Frame, area: Rect, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Input line
            Constraint::Length(1), // Spacer
            Constraint::Length(2), // Feedback
            Constraint::Length(1), // Score
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Hints and command help
        ])
        .split(area);

    let input =
        Paragraph::new(format!("> {}_", app.input)).style(Style::default().fg(Color::White));
    frame.render_widget(input, main_layout[0]);

    let feedback = Paragraph::new(app.feedback.as_str())
        .style(Style::default().fg(feedback_color(&app.feedback)))
        .wrap(Wrap { trim: true });
    frame.render_widget(feedback, main_layout[2]);

    let score = Paragraph::new(format!(
        "Счет: Вы {} - {} Бот",
        app.score.player, app.score.opponent
    ))
    .style(Style::default().fg(Color::Magenta).bold());
    frame.render_widget(score, main_layout[3]);

    let mut lines: Vec<Line> = app
        .hints
        .iter()
        .map(|city| Line::styled(format!("  💡 {}", city), Style::default().fg(Color::Green)))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::styled(
        "сдаться · подсказка · что за город? · фейк",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(lines), main_layout[5]);
}

/// Render the game-over summary
fn render_game_over(frame: &mut Frame, area: Rect, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(1), // Spacer
            Constraint::Length(3), // Verdict line
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Instructions
            Constraint::Min(0),    // Remaining space
        ])
        .split(area);

    let (title, color) = match app.summary.as_ref().map(|s| s.verdict) {
        Some(Verdict::Win) => ("ПОБЕДА!", Color::Green),
        Some(Verdict::Loss) => ("ПОРАЖЕНИЕ", Color::Red),
        _ => ("НИЧЬЯ", Color::Yellow),
    };
    let title = Paragraph::new(title)
        .style(Style::default().fg(color).bold())
        .alignment(Alignment::Center);
    frame.render_widget(title, main_layout[0]);

    let verdict = Paragraph::new(app.feedback.as_str())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(verdict, main_layout[2]);

    let instructions = Paragraph::new("Enter - в меню")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(instructions, main_layout[4]);
}

/// Render the recent chain, newest at the bottom
fn render_chain(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .log
        .iter()
        .map(|entry| {
            let (who, style) = match entry.speaker {
                Speaker::Player => ("Вы ", Style::default().fg(Color::Cyan)),
                Speaker::Opponent => ("Бот", Style::default().fg(Color::White)),
            };
            ListItem::new(format!("{}: {}", who, entry.city)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Города"),
    );
    frame.render_widget(list, area);
}

fn format_required(letter: Option<char>) -> String {
    match letter {
        Some(letter) => format!("[ Вам на букву: {} ]", upper(letter)),
        None => String::from("[ ... ]"),
    }
}

/// Format the timer display
fn format_timer(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn feedback_color(feedback: &str) -> Color {
    if feedback.starts_with("Принято") {
        Color::Green
    } else if feedback.starts_with("Я не знаю")
        || feedback.starts_with("Нужен город")
        || feedback.starts_with("Город ")
    {
        Color::Red
    } else {
        Color::White
    }
}
