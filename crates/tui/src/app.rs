use std::{collections::BTreeMap, io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use treasure_hunter_core::{
    session::ShopVisit, AppConfig, Command, GameMode, GameSession, GameStatus, Narrative,
    Snapshot, Tone, TradeSide, TurnReport,
};

use crate::banner;

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_INPUT_LEN: usize = 32;
const MAX_NEWS: usize = 200;

#[derive(Debug, Clone)]
struct Theme {
    text: Color,
    muted: Color,
    accent: Color,
    gold: Color,
    item: Color,
    treasure: Color,
    terrain: Color,
    katana: Color,
    friendly: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::White,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            gold: Color::Rgb(245, 166, 35),
            item: Color::Magenta,
            treasure: Color::LightBlue,
            terrain: Color::Cyan,
            katana: Color::Red,
            friendly: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

impl Theme {
    fn color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Plain => self.text,
            Tone::Gold => self.gold,
            Tone::Item => self.item,
            Tone::Treasure => self.treasure,
            Tone::Terrain => self.terrain,
            Tone::Katana => self.katana,
            Tone::Danger => self.danger,
            Tone::Friendly => self.friendly,
            Tone::Success => self.success,
            Tone::Warning => self.warning,
        }
    }

    fn style(&self, tone: Tone) -> Style {
        let style = Style::default().fg(self.color(tone));
        match tone {
            Tone::Katana | Tone::Treasure => style.add_modifier(Modifier::BOLD),
            _ => style,
        }
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Color> {
        let slot = match key {
            "plain" | "text" => &mut self.text,
            "muted" => &mut self.muted,
            "accent" => &mut self.accent,
            "gold" => &mut self.gold,
            "item" => &mut self.item,
            "treasure" => &mut self.treasure,
            "terrain" => &mut self.terrain,
            "katana" => &mut self.katana,
            "friendly" => &mut self.friendly,
            "success" => &mut self.success,
            "warning" => &mut self.warning,
            "danger" => &mut self.danger,
            _ => return None,
        };
        Some(slot)
    }
}

fn load_theme(overrides: &BTreeMap<String, String>) -> (Theme, String) {
    let mut theme = Theme::default();
    if overrides.is_empty() {
        return (theme, "Using default palette.".to_string());
    }

    let mut applied = 0;
    let mut rejected: Vec<&str> = Vec::new();
    for (key, value) in overrides {
        let color = parse_hex_color(value);
        match (theme.slot_mut(&key.to_lowercase()), color) {
            (Some(slot), Some(color)) => {
                *slot = color;
                applied += 1;
            }
            _ => rejected.push(key),
        }
    }

    if rejected.is_empty() {
        (theme, format!("Applied {applied} theme colours."))
    } else {
        warn!(?rejected, "ignored theme overrides");
        (
            theme,
            format!(
                "Applied {applied} theme colours; ignored {}.",
                rejected.join(", ")
            ),
        )
    }
}

fn parse_hex_color(input: &str) -> Option<Color> {
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let channel = |range: std::ops::Range<usize>, repeat: bool| {
        let digits = hex.get(range)?;
        let digits = if repeat { digits.repeat(2) } else { digits.to_string() };
        u8::from_str_radix(&digits, 16).ok()
    };
    match hex.len() {
        6 => Some(Color::Rgb(
            channel(0..2, false)?,
            channel(2..4, false)?,
            channel(4..6, false)?,
        )),
        3 => Some(Color::Rgb(
            channel(0..1, true)?,
            channel(1..2, true)?,
            channel(2..3, true)?,
        )),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Title,
    ModeSelect,
    Play,
    GameOver,
}

/// Single-line text field with cursor editing.
#[derive(Debug, Clone)]
struct TextPrompt {
    title: String,
    instruction: String,
    input: String,
    cursor: usize,
}

impl TextPrompt {
    fn new(title: impl Into<String>, instruction: impl Into<String>, initial: String) -> Self {
        let cursor = initial.len();
        Self {
            title: title.into(),
            instruction: instruction.into(),
            input: initial,
            cursor,
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, self.input.len() as isize) as usize;
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    fn insert(&mut self, ch: char) {
        if self.input.len() >= MAX_INPUT_LEN || !ch.is_ascii() || ch.is_ascii_control() {
            return;
        }
        self.input.insert(self.cursor, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.input.remove(self.cursor);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.input.len() {
            self.input.remove(self.cursor);
        }
    }

    fn value(&self) -> &str {
        self.input.trim()
    }

    /// Apply an editing key. Returns false when the key is not an edit.
    fn edit(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Char(ch)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                self.insert(ch)
            }
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Clone)]
enum ShopModal {
    /// Waiting for an item name.
    Item(TextPrompt),
    /// Waiting for y/n on a quoted price.
    Confirm,
}

enum AppEvent {
    Input(Event),
    Tick,
}

struct NewsEntry {
    stamp: String,
    narrative: Narrative,
}

/// Terminal front end for a game session.
pub struct TreasureHunterApp {
    config: AppConfig,
    screen: Screen,
    session: Option<GameSession>,
    name_prompt: TextPrompt,
    hunter_name: String,
    mode_cursor: usize,
    mode_answer: String,
    shop_modal: Option<ShopModal>,
    news: Vec<NewsEntry>,
    snapshot: Option<Snapshot>,
    final_status: GameStatus,
    status: String,
    theme: Theme,
    should_quit: bool,
}

impl TreasureHunterApp {
    pub fn new(config: AppConfig) -> Self {
        let (theme, theme_status) = load_theme(&config.theme);
        let default_name = config.hunter_name.clone().unwrap_or_default();
        Self {
            config,
            screen: Screen::Title,
            session: None,
            name_prompt: name_prompt(default_name),
            hunter_name: String::new(),
            mode_cursor: 1,
            mode_answer: String::new(),
            shop_modal: None,
            news: Vec::new(),
            snapshot: None,
            final_status: GameStatus::Ongoing,
            status: theme_status,
            theme,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        let result = loop {
            if let Err(err) = terminal.draw(|frame| self.draw(frame)) {
                break Err(err).context("failed to draw frame");
            }
            if self.should_quit {
                break Ok(());
            }
            match event_rx.recv().await {
                Some(AppEvent::Input(event)) => self.handle_input(event),
                Some(AppEvent::Tick) => {}
                None => break Ok(()),
            }
        };

        restore_terminal(&mut terminal)?;
        result
    }

    fn handle_input(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.screen {
            Screen::Title => self.handle_title_key(key),
            Screen::ModeSelect => self.handle_mode_key(key),
            Screen::Play => self.handle_play_key(key),
            Screen::GameOver => self.handle_game_over_key(key),
        }
    }

    fn handle_title_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => {
                let name = self.name_prompt.value().to_string();
                if name.is_empty() {
                    self.status = "Every hunter needs a name.".to_string();
                    return;
                }
                self.hunter_name = name;
                self.mode_answer.clear();
                self.screen = Screen::ModeSelect;
                self.status = "Pick a mode, or type your answer.".to_string();
            }
            _ => {
                self.name_prompt.edit(&key);
            }
        }
    }

    fn handle_mode_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.screen = Screen::Title;
            }
            KeyCode::Up => {
                self.mode_cursor = self.mode_cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                self.mode_cursor = (self.mode_cursor + 1).min(GameMode::LISTED.len() - 1);
            }
            KeyCode::Backspace => {
                self.mode_answer.pop();
            }
            KeyCode::Enter => {
                let choice = if self.mode_answer.trim().is_empty() {
                    mode_choice(&GameMode::LISTED[self.mode_cursor].to_string())
                } else {
                    mode_choice(&self.mode_answer)
                };
                self.start_game(&choice);
            }
            KeyCode::Char(ch) if self.mode_answer.len() < MAX_INPUT_LEN => {
                if ch.is_ascii() && !ch.is_ascii_control() {
                    self.mode_answer.push(ch);
                }
            }
            _ => {}
        }
    }

    fn start_game(&mut self, choice: &str) {
        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (session, report) = GameSession::start(&self.hunter_name, choice, rng);
        info!(hunter = %self.hunter_name, mode = %session.mode(), seed = ?self.config.seed, "new game");
        self.session = Some(session);
        self.news.clear();
        self.shop_modal = None;
        self.screen = Screen::Play;
        self.status = "What's your next move?".to_string();
        self.record(report);
    }

    fn handle_play_key(&mut self, key: KeyEvent) {
        let Some(session) = self.session.as_mut() else {
            self.screen = Screen::Title;
            return;
        };

        let report = match self.shop_modal.as_mut() {
            Some(ShopModal::Item(prompt)) => match key.code {
                KeyCode::Esc => Some(session.leave_shop()),
                KeyCode::Enter => Some(session.quote(prompt.value())),
                _ => {
                    prompt.edit(&key);
                    None
                }
            },
            Some(ShopModal::Confirm) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Some(session.confirm(true)),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    Some(session.confirm(false))
                }
                _ => None,
            },
            None => match key.code {
                KeyCode::Char(ch) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
                    Some(session.apply_input(&ch.to_string()))
                }
                _ => None,
            },
        };

        if let Some(report) = report {
            self.shop_modal = shop_modal_for(report.snapshot.shop);
            self.record(report);
        }
    }

    fn handle_game_over_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.session = None;
                self.snapshot = None;
                self.news.clear();
                self.name_prompt = name_prompt(self.hunter_name.clone());
                self.screen = Screen::Title;
                self.status = "Ready for another hunt.".to_string();
            }
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn record(&mut self, report: TurnReport) {
        match serde_json::to_string(&report.snapshot) {
            Ok(json) => debug!(snapshot = %json, status = ?report.status, "turn applied"),
            Err(err) => error!(?err, "failed to encode snapshot"),
        }
        if !report.narrative.is_empty() {
            self.news.push(NewsEntry {
                stamp: Local::now().format("%H:%M:%S").to_string(),
                narrative: report.narrative,
            });
            if self.news.len() > MAX_NEWS {
                let excess = self.news.len() - MAX_NEWS;
                self.news.drain(..excess);
            }
        }
        self.snapshot = Some(report.snapshot);
        if report.status.is_over() {
            self.final_status = report.status;
            self.shop_modal = None;
            self.screen = Screen::GameOver;
            self.status = "Enter to play again, q to quit.".to_string();
        }
    }

    fn draw(&self, frame: &mut Frame) {
        match self.screen {
            Screen::Title => self.draw_title(frame),
            Screen::ModeSelect => self.draw_mode_select(frame),
            Screen::Play => self.draw_play(frame),
            Screen::GameOver => self.draw_game_over(frame),
        }
    }

    fn draw_title(&self, frame: &mut Frame) {
        let area = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(15.min(area.height)),
                Constraint::Min(7),
                Constraint::Length(3),
            ])
            .split(area);

        let mut lines = banner::render("Treasure");
        lines.extend(banner::render("Hunter"));
        self.render_banner(frame, layout[0], &lines, self.theme.gold);
        self.render_prompt(frame, layout[1], &self.name_prompt);
        self.render_status(frame, layout[2]);
    }

    fn draw_mode_select(&self, frame: &mut Frame) {
        let area = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(3)])
            .split(area);

        let mut lines = vec![
            Line::from(format!("Welcome, {}.", self.hunter_name)),
            Line::from(""),
        ];
        for (index, mode) in GameMode::LISTED.iter().enumerate() {
            let selected = index == self.mode_cursor && self.mode_answer.is_empty();
            let (marker, style) = if selected {
                (
                    "▶ ",
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", Style::default().fg(self.theme.text))
            };
            lines.push(Line::from(Span::styled(
                format!("{marker}{}", mode.label()),
                style,
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Answer: ", Style::default().fg(self.theme.muted)),
            Span::raw(self.mode_answer.clone()),
        ]));

        let box_area = centered_rect(44, lines.len() as u16 + 2, layout[0]);
        let menu = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Choose your difficulty"),
        );
        frame.render_widget(menu, box_area);
        self.render_status(frame, layout[1]);
    }

    fn draw_play(&self, frame: &mut Frame) {
        let area = frame.size();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(6), Constraint::Length(3)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(38), Constraint::Min(30)])
            .split(rows[0]);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[0]);

        if let Some(snapshot) = &self.snapshot {
            self.render_hunter(frame, left[0], snapshot);
            self.render_town(frame, left[1], snapshot);
        }
        self.render_news(frame, columns[1]);
        self.render_help(frame, rows[1]);
        self.render_status(frame, rows[2]);

        match &self.shop_modal {
            Some(ShopModal::Item(prompt)) => {
                let modal = centered_rect(50, 7, area);
                frame.render_widget(Clear, modal);
                self.render_prompt(frame, modal, prompt);
            }
            Some(ShopModal::Confirm) => self.render_confirm(frame, area),
            None => {}
        }
    }

    fn draw_game_over(&self, frame: &mut Frame) {
        let area = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(area);

        let (text, color) = match self.final_status {
            GameStatus::Won => ("You win!", self.theme.success),
            GameStatus::Lost => ("Game over", self.theme.danger),
            GameStatus::Quit | GameStatus::Ongoing => ("Farewell", self.theme.accent),
        };
        self.render_banner(frame, layout[0], &banner::render(text), color);
        self.render_news(frame, layout[1]);
        self.render_status(frame, layout[2]);
    }

    fn render_hunter(&self, frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
        let gold_style = if snapshot.gold < 0 {
            self.theme.style(Tone::Danger)
        } else {
            self.theme.style(Tone::Gold)
        };
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Gold: ", Style::default().fg(self.theme.muted)),
                Span::styled(format!("{}", snapshot.gold), gold_style),
            ]),
            Line::from(Span::styled("Kit:", Style::default().fg(self.theme.muted))),
        ];
        if snapshot.kit.is_empty() {
            lines.push(Line::from("  (empty)"));
        }
        for item in &snapshot.kit {
            let tone = if *item == treasure_hunter_core::ItemKind::Katana {
                Tone::Katana
            } else {
                Tone::Item
            };
            lines.push(Line::from(Span::styled(
                format!("  {item}"),
                self.theme.style(tone),
            )));
        }
        lines.push(Line::from(Span::styled(
            format!("Treasures ({}/3):", snapshot.treasures.len()),
            Style::default().fg(self.theme.muted),
        )));
        for treasure in &snapshot.treasures {
            lines.push(Line::from(Span::styled(
                format!("  {}", treasure.label()),
                self.theme.style(Tone::Treasure),
            )));
        }

        let title = format!("{} ({})", snapshot.hunter, snapshot.mode);
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_town(&self, frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
        let mood = if snapshot.tough_town {
            Span::styled("rough", self.theme.style(Tone::Warning))
        } else {
            Span::styled("sleepy", self.theme.style(Tone::Friendly))
        };
        let flag = |done: bool| if done { "done" } else { "not yet" };
        let lines = vec![
            Line::from(vec![
                Span::raw("Surrounded by "),
                Span::styled(snapshot.terrain.clone(), self.theme.style(Tone::Terrain)),
            ]),
            Line::from(vec![
                Span::raw("Needs "),
                Span::styled(
                    snapshot.required_item.to_string(),
                    self.theme.style(Tone::Item),
                ),
            ]),
            Line::from(vec![Span::raw("Mood: "), mood]),
            Line::from(format!("Searched: {}", flag(snapshot.searched))),
            Line::from(format!("Dug: {}", flag(snapshot.dug))),
        ];
        let title = format!("Town #{}", snapshot.towns_visited);
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_news(&self, frame: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        for entry in &self.news {
            lines.push(Line::from(Span::styled(
                format!("[{}]", entry.stamp),
                Style::default().fg(self.theme.muted),
            )));
            lines.extend(self.narrative_lines(&entry.narrative));
            lines.push(Line::from(""));
        }
        let visible = area.height.saturating_sub(2) as usize;
        let scroll = lines.len().saturating_sub(visible) as u16;
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Latest news"))
            .scroll((scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn narrative_lines(&self, narrative: &Narrative) -> Vec<Line<'static>> {
        narrative
            .lines()
            .into_iter()
            .map(|fragments| {
                Line::from(
                    fragments
                        .into_iter()
                        .map(|fragment| Span::styled(fragment.text, self.theme.style(fragment.tone)))
                        .collect::<Vec<_>>(),
                )
            })
            .collect()
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let key_style = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);
        let entries: Vec<Span> = Command::ALL
            .iter()
            .flat_map(|command| {
                [
                    Span::styled(command.letter().to_string(), key_style),
                    Span::raw(format!(" {}   ", command.menu_label())),
                ]
            })
            .collect();
        let mut lines = vec![Line::from(entries)];
        if let Some(session) = &self.session {
            lines.extend(self.narrative_lines(&session.info()));
        }
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Commands"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_prompt(&self, frame: &mut Frame, area: Rect, prompt: &TextPrompt) {
        let area = centered_rect(50, 7, area);
        let lines = vec![
            Line::from(prompt.instruction.clone()),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(self.theme.accent)),
                Span::raw(prompt.input.clone()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" confirm  "),
                Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" cancel"),
            ]),
        ];
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(prompt.title.clone()),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);

        let cursor_x =
            (area.x + 3 + prompt.cursor as u16).min(area.x + area.width.saturating_sub(2));
        frame.set_cursor(cursor_x, area.y + 2);
    }

    fn render_confirm(&self, frame: &mut Frame, area: Rect) {
        let quote = self
            .news
            .last()
            .map(|entry| self.narrative_lines(&entry.narrative))
            .unwrap_or_default();
        let modal = centered_rect(50, quote.len() as u16 + 4, area);
        frame.render_widget(Clear, modal);
        let mut lines = quote;
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" deal  "),
            Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" walk away"),
        ]));
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Shopkeeper"))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, modal);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(Line::from(self.status.clone()))
            .block(Block::default().borders(Borders::ALL).title("Status"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_banner(&self, frame: &mut Frame, area: Rect, lines: &[String], color: Color) {
        let content: Vec<Line> = lines
            .iter()
            .map(|line| {
                Line::from(Span::styled(
                    line.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        let paragraph = Paragraph::new(content).alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }
}

fn name_prompt(initial: String) -> TextPrompt {
    TextPrompt::new(
        "Welcome to TREASURE HUNTER!",
        "Going hunting for the big treasure, eh? What's your name, Hunter?",
        initial,
    )
}

/// Full mode names from the picker or typed by hand map to their letters.
fn mode_choice(answer: &str) -> String {
    let answer = answer.trim().to_lowercase();
    match answer.as_str() {
        "easy" | "normal" | "hard" | "samurai" => answer[..1].to_string(),
        _ => answer,
    }
}

fn shop_modal_for(visit: Option<ShopVisit>) -> Option<ShopModal> {
    let visit = visit?;
    if visit.pending.is_some() {
        return Some(ShopModal::Confirm);
    }
    let (title, instruction) = match visit.side {
        TradeSide::Buy => ("Buy", "What're you lookin' to buy?"),
        TradeSide::Sell => ("Sell", "What're you lookin' to sell?"),
    };
    Some(ShopModal::Item(TextPrompt::new(
        title,
        instruction,
        String::new(),
    )))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        let next = match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => AppEvent::Input(evt),
                Err(_) => break,
            },
            Ok(false) => AppEvent::Tick,
            Err(_) => break,
        };
        if sender.blocking_send(next).is_err() {
            break;
        }
    });
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_mode_names_ignore_case() {
        assert_eq!(mode_choice("Easy"), "e");
        assert_eq!(mode_choice(" SAMURAI "), "s");
        assert_eq!(mode_choice("Test Lose"), "test lose");
        assert_eq!(mode_choice("H"), "h");
        assert_eq!(
            GameMode::from_choice(&mode_choice("Hard")),
            (GameMode::Hard, true)
        );
    }

    #[test]
    fn hex_colours_parse_in_long_and_short_form() {
        assert_eq!(parse_hex_color("#ffcc00"), Some(Color::Rgb(255, 204, 0)));
        assert_eq!(parse_hex_color("fc0"), Some(Color::Rgb(255, 204, 0)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
    }

    #[test]
    fn theme_overrides_report_rejects() {
        let overrides = BTreeMap::from([
            ("gold".to_string(), "#010203".to_string()),
            ("sparkle".to_string(), "#ffffff".to_string()),
        ]);
        let (theme, note) = load_theme(&overrides);
        assert_eq!(theme.color(Tone::Gold), Color::Rgb(1, 2, 3));
        assert!(note.contains("sparkle"));
    }

    #[test]
    fn prompt_edits_at_the_cursor() {
        let mut prompt = TextPrompt::new("t", "i", "rpe".to_string());
        prompt.move_cursor(-1);
        prompt.move_cursor(-1);
        prompt.insert('o');
        assert_eq!(prompt.value(), "rope");
        prompt.move_end();
        prompt.backspace();
        prompt.move_home();
        prompt.delete();
        assert_eq!(prompt.value(), "op");
    }

    #[test]
    fn shop_modal_follows_the_visit() {
        assert!(shop_modal_for(None).is_none());
        let open = shop_modal_for(Some(ShopVisit {
            side: TradeSide::Sell,
            pending: None,
        }));
        assert!(matches!(open, Some(ShopModal::Item(ref prompt)) if prompt.title == "Sell"));
        let quoted = shop_modal_for(Some(ShopVisit {
            side: TradeSide::Buy,
            pending: Some(treasure_hunter_core::ItemKind::Rope),
        }));
        assert!(matches!(quoted, Some(ShopModal::Confirm)));
    }
}
