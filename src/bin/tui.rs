//! titanwiki TUI - Terminal browser for the Attack on Titan wiki
//!
//! Sidebar navigation between the franchise overview and the five wiki
//! collections, with filterable, paged character listings and details modals.

use color_eyre::{eyre::Result, install};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::{fs::OpenOptions, io, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use titanwiki::prelude::*;

// Application events
#[derive(Debug)]
enum AppEvent {
    Characters(Action<Character>),
    Episodes(Action<Episode>),
    Locations(Action<Location>),
    Organizations(Action<Organization>),
    Titans(Action<Titan>),
    Overview(Vec<(Endpoint, std::result::Result<u32, String>)>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AppMode {
    Home,
    Characters,
    Episodes,
    Locations,
    Organizations,
    Titans,
    Help,
}

impl AppMode {
    const ALL: [AppMode; 7] = [
        AppMode::Home,
        AppMode::Characters,
        AppMode::Episodes,
        AppMode::Locations,
        AppMode::Organizations,
        AppMode::Titans,
        AppMode::Help,
    ];

    fn title(&self) -> &'static str {
        match self {
            AppMode::Home => "Home",
            AppMode::Characters => "Characters",
            AppMode::Episodes => "Episodes",
            AppMode::Locations => "Locations",
            AppMode::Organizations => "Organizations",
            AppMode::Titans => "Titans",
            AppMode::Help => "Help",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ModalState {
    None,
    HelpDialog,
}

#[derive(Debug, Clone, PartialEq)]
enum OverviewCount {
    Loading,
    Count(u32),
    Failed(String),
}

// Color scheme
mod theme {
    use ratatui::style::Color;

    pub const PRIMARY: Color = Color::Rgb(178, 34, 34); // Survey Corps red

    pub const ACCENT: Color = Color::Rgb(255, 152, 0); // Orange
    pub const SUCCESS: Color = Color::Rgb(76, 175, 80); // Green
    pub const WARNING: Color = Color::Rgb(255, 193, 7); // Yellow
    pub const ERROR: Color = Color::Rgb(244, 67, 54); // Red
    pub const INFO: Color = Color::Rgb(33, 150, 243); // Light Blue

    pub const TEXT_PRIMARY: Color = Color::Rgb(255, 255, 255);
    pub const TEXT_SECONDARY: Color = Color::Rgb(189, 189, 189);
    pub const TEXT_MUTED: Color = Color::Rgb(117, 117, 117);

    pub const BORDER: Color = Color::Rgb(66, 66, 66);
    pub const BORDER_FOCUS: Color = PRIMARY;
}

#[derive(Debug, Clone, PartialEq)]
enum StatusType {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusType {
    fn line(&self, message: &str) -> Line<'static> {
        match self {
            StatusType::Info => info_message(message),
            StatusType::Success => success_message(message),
            StatusType::Warning => warning_message(message),
            StatusType::Error => error_message(message),
        }
    }

    fn color(&self) -> Color {
        match self {
            StatusType::Info => theme::INFO,
            StatusType::Success => theme::SUCCESS,
            StatusType::Warning => theme::WARNING,
            StatusType::Error => theme::ERROR,
        }
    }
}

/// What spawned tasks need to report back.
struct Tasks {
    api: Arc<dyn WikiApi>,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl Tasks {
    fn run<T: Resource>(&self, effect: Option<Effect>, wrap: fn(Action<T>) -> AppEvent) {
        let events = self.events.clone();
        let deliver = move |action: Action<T>| {
            let _ = events.send(wrap(action));
        };

        match effect {
            Some(Effect::Fetch(request)) => {
                request.spawn_with(self.api.clone(), deliver);
            }
            Some(Effect::ProbeImage(probe)) => {
                probe.spawn_with(self.api.clone(), deliver);
            }
            None => {}
        }
    }

    fn load_overview(&self) {
        let api = self.api.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let counts = overview(api.as_ref())
                .await
                .into_iter()
                .map(|(endpoint, count)| {
                    (endpoint, count.map_err(|e| e.user_message(endpoint.path())))
                })
                .collect();
            let _ = events.send(AppEvent::Overview(counts));
        });
    }
}

/// Applies `action` to `browser` and runs whatever it asks for.
fn drive<T: Resource>(
    browser: &mut Browser<T>,
    action: Action<T>,
    tasks: &Tasks,
    wrap: fn(Action<T>) -> AppEvent,
) {
    let effect = browser.dispatch(action);
    tasks.run(effect, wrap);
}

/// Loads the first page the first time a list is shown.
fn ensure_loaded<T: Resource>(
    browser: &mut Browser<T>,
    tasks: &Tasks,
    wrap: fn(Action<T>) -> AppEvent,
) {
    if matches!(browser.state(), LoadState::Idle) {
        drive(browser, Action::Load, tasks, wrap);
    }
}

/// Keys shared by every list pane. `c` only applies to filterable lists.
fn list_action<T: Resource>(key: KeyCode, modal_open: bool) -> Option<Action<T>> {
    if modal_open {
        return match key {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => Some(Action::CloseDetails),
            _ => None,
        };
    }

    match key {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrevious),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::PreviousPage),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::NextPage),
        KeyCode::Home => Some(Action::FirstPage),
        KeyCode::End => Some(Action::LastPage),
        KeyCode::Enter => Some(Action::OpenSelected),
        KeyCode::Char('r') => Some(Action::Retry),
        KeyCode::Char('c') if T::ENDPOINT.supports_filters() => Some(Action::ClearFilters),
        _ => None,
    }
}

fn browser_status<T: Resource>(browser: &Browser<T>) -> Option<(String, StatusType)> {
    if let Some(message) = browser.error() {
        return Some((message.to_string(), StatusType::Error));
    }
    match browser.state() {
        LoadState::Ready(page) if page.is_empty() => Some((
            format!("No {} match the current filters", T::ENDPOINT.path()),
            StatusType::Warning,
        )),
        LoadState::Ready(page) => Some((
            format!(
                "{} {} · page {} of {}",
                page.info.count,
                T::ENDPOINT.path(),
                browser.current_page(),
                browser.total_pages()
            ),
            StatusType::Success,
        )),
        _ => None,
    }
}

struct App {
    // Core state
    mode: AppMode,
    modal_state: ModalState,
    should_quit: bool,
    sidebar_selected: usize,

    // Home state
    overview: Vec<(Endpoint, OverviewCount)>,

    // List views
    characters: Browser<Character>,
    episodes: Browser<Episode>,
    locations: Browser<Location>,
    organizations: Browser<Organization>,
    titans: Browser<Titan>,

    // Filter editing (characters)
    filter_focus: FilterField,
    editing: Option<String>,

    // UI state
    status_message: String,
    status_type: StatusType,

    // Communication
    event_receiver: mpsc::UnboundedReceiver<AppEvent>,
    tasks: Tasks,
}

impl App {
    fn new(config: &Config, api: Arc<dyn WikiApi>) -> Self {
        let (event_sender, event_receiver) = mpsc::unbounded_channel();
        let placeholder = config.placeholder_image.as_str();

        let tasks = Tasks {
            api,
            events: event_sender,
        };
        tasks.load_overview();

        Self {
            mode: AppMode::Home,
            modal_state: ModalState::None,
            should_quit: false,
            sidebar_selected: 0,

            overview: Endpoint::ALL
                .iter()
                .map(|&endpoint| (endpoint, OverviewCount::Loading))
                .collect(),

            characters: Browser::new(placeholder),
            episodes: Browser::new(placeholder),
            locations: Browser::new(placeholder),
            organizations: Browser::new(placeholder),
            titans: Browser::new(placeholder),

            filter_focus: FilterField::Name,
            editing: None,

            status_message: format!("Connected to {}", config.api_base),
            status_type: StatusType::Info,

            event_receiver,
            tasks,
        }
    }

    fn set_status(&mut self, message: String, status_type: StatusType) {
        self.status_message = message;
        self.status_type = status_type;
    }

    fn details_open(&self) -> bool {
        match self.mode {
            AppMode::Characters => self.characters.modal().is_open(),
            AppMode::Episodes => self.episodes.modal().is_open(),
            AppMode::Locations => self.locations.modal().is_open(),
            AppMode::Organizations => self.organizations.modal().is_open(),
            AppMode::Titans => self.titans.modal().is_open(),
            AppMode::Home | AppMode::Help => false,
        }
    }

    fn select_mode(&mut self, index: usize) {
        self.sidebar_selected = index % AppMode::ALL.len();
        self.mode = AppMode::ALL[self.sidebar_selected];
        self.editing = None;

        let tasks = &self.tasks;
        match self.mode {
            AppMode::Characters => ensure_loaded(&mut self.characters, tasks, AppEvent::Characters),
            AppMode::Episodes => ensure_loaded(&mut self.episodes, tasks, AppEvent::Episodes),
            AppMode::Locations => ensure_loaded(&mut self.locations, tasks, AppEvent::Locations),
            AppMode::Organizations => {
                ensure_loaded(&mut self.organizations, tasks, AppEvent::Organizations)
            }
            AppMode::Titans => ensure_loaded(&mut self.titans, tasks, AppEvent::Titans),
            AppMode::Home | AppMode::Help => {}
        }
    }

    fn handle_key_event(&mut self, key: KeyCode) {
        // Handle modal states first
        if self.modal_state != ModalState::None {
            self.modal_state = ModalState::None;
            return;
        }

        if self.editing.is_some() {
            self.handle_editing_keys(key);
            return;
        }

        // Global keys
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc if !self.details_open() => self.should_quit = true,
            KeyCode::F(1) | KeyCode::Char('?') => {
                self.modal_state = ModalState::HelpDialog;
            }
            KeyCode::Tab if !self.details_open() => self.select_mode(self.sidebar_selected + 1),
            KeyCode::BackTab if !self.details_open() => {
                self.select_mode(self.sidebar_selected + AppMode::ALL.len() - 1)
            }
            _ => self.handle_mode_key_event(key),
        }
    }

    fn handle_mode_key_event(&mut self, key: KeyCode) {
        let tasks = &self.tasks;
        match self.mode {
            AppMode::Home => {
                if key == KeyCode::Char('r') {
                    for (_, count) in self.overview.iter_mut() {
                        *count = OverviewCount::Loading;
                    }
                    tasks.load_overview();
                }
            }
            AppMode::Characters => self.handle_character_keys(key),
            AppMode::Episodes => {
                if let Some(action) = list_action(key, self.episodes.modal().is_open()) {
                    drive(&mut self.episodes, action, tasks, AppEvent::Episodes);
                }
            }
            AppMode::Locations => {
                if let Some(action) = list_action(key, self.locations.modal().is_open()) {
                    drive(&mut self.locations, action, tasks, AppEvent::Locations);
                }
            }
            AppMode::Organizations => {
                if let Some(action) = list_action(key, self.organizations.modal().is_open()) {
                    drive(&mut self.organizations, action, tasks, AppEvent::Organizations);
                }
            }
            AppMode::Titans => {
                if let Some(action) = list_action(key, self.titans.modal().is_open()) {
                    drive(&mut self.titans, action, tasks, AppEvent::Titans);
                }
            }
            AppMode::Help => {}
        }
    }

    fn handle_character_keys(&mut self, key: KeyCode) {
        let modal_open = self.characters.modal().is_open();

        if !modal_open {
            let filter_action = match key {
                KeyCode::Char('/') | KeyCode::Char('n') => {
                    self.start_editing(FilterField::Name);
                    None
                }
                KeyCode::Char('o') => {
                    self.start_editing(FilterField::Occupation);
                    None
                }
                KeyCode::Char('s') => Some(FilterField::Status),
                KeyCode::Char('g') => Some(FilterField::Gender),
                _ => {
                    if let Some(action) = list_action(key, false) {
                        drive(&mut self.characters, action, &self.tasks, AppEvent::Characters);
                    }
                    return;
                }
            };

            if let Some(field) = filter_action {
                self.filter_focus = field;
                let value = self.characters.inputs().cycled(field);
                drive(
                    &mut self.characters,
                    Action::SetFilter(field, value),
                    &self.tasks,
                    AppEvent::Characters,
                );
            }
            return;
        }

        if let Some(action) = list_action(key, true) {
            drive(&mut self.characters, action, &self.tasks, AppEvent::Characters);
        }
    }

    fn start_editing(&mut self, field: FilterField) {
        self.filter_focus = field;
        self.editing = Some(self.characters.inputs().get(field).to_string());
        self.set_status(
            format!("Type a {} and press Enter", field.label().to_lowercase()),
            StatusType::Info,
        );
    }

    fn handle_editing_keys(&mut self, key: KeyCode) {
        let Some(buffer) = self.editing.as_mut() else {
            return;
        };

        match key {
            KeyCode::Enter => {
                let value = std::mem::take(buffer);
                self.editing = None;
                let field = self.filter_focus;
                drive(
                    &mut self.characters,
                    Action::SetFilter(field, value),
                    &self.tasks,
                    AppEvent::Characters,
                );
            }
            KeyCode::Esc => {
                self.editing = None;
                self.set_status("Edit cancelled".to_string(), StatusType::Info);
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => {}
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        let tasks = &self.tasks;
        let status = match event {
            AppEvent::Characters(action) => {
                let completed = matches!(action, Action::Completed { .. });
                drive(&mut self.characters, action, tasks, AppEvent::Characters);
                completed.then(|| browser_status(&self.characters)).flatten()
            }
            AppEvent::Episodes(action) => {
                let completed = matches!(action, Action::Completed { .. });
                drive(&mut self.episodes, action, tasks, AppEvent::Episodes);
                completed.then(|| browser_status(&self.episodes)).flatten()
            }
            AppEvent::Locations(action) => {
                let completed = matches!(action, Action::Completed { .. });
                drive(&mut self.locations, action, tasks, AppEvent::Locations);
                completed.then(|| browser_status(&self.locations)).flatten()
            }
            AppEvent::Organizations(action) => {
                let completed = matches!(action, Action::Completed { .. });
                drive(&mut self.organizations, action, tasks, AppEvent::Organizations);
                completed.then(|| browser_status(&self.organizations)).flatten()
            }
            AppEvent::Titans(action) => {
                let completed = matches!(action, Action::Completed { .. });
                drive(&mut self.titans, action, tasks, AppEvent::Titans);
                completed.then(|| browser_status(&self.titans)).flatten()
            }
            AppEvent::Overview(counts) => {
                for (endpoint, count) in counts {
                    if let Some((_, slot)) = self.overview.iter_mut().find(|(e, _)| *e == endpoint) {
                        *slot = match count {
                            Ok(n) => OverviewCount::Count(n),
                            Err(message) => OverviewCount::Failed(message),
                        };
                    }
                }
                None
            }
        };

        if let Some((message, status_type)) = status {
            self.set_status(message, status_type);
        }
    }
}

// Rendering implementation
impl App {
    fn render(&mut self, f: &mut Frame) {
        let size = f.size();

        // Main layout with sidebar
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(20), Constraint::Min(0)])
            .split(size);

        self.render_sidebar(f, chunks[0]);

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status bar
            ])
            .split(chunks[1]);

        self.render_header(f, main_chunks[0]);
        self.render_main_content(f, main_chunks[1]);
        self.render_status_bar(f, main_chunks[2]);

        // Render modals on top
        self.render_modals(f);
    }

    fn render_sidebar(&self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = AppMode::ALL
            .iter()
            .enumerate()
            .map(|(i, mode)| {
                let style = if i == self.sidebar_selected {
                    Style::default()
                        .fg(theme::PRIMARY)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme::TEXT_SECONDARY)
                };

                ListItem::new(Line::from(mode.title())).style(style)
            })
            .collect();

        let sidebar = List::new(items).block(
            Block::default()
                .title("titanwiki")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::BORDER))
                .title_style(
                    Style::default()
                        .fg(theme::PRIMARY)
                        .add_modifier(Modifier::BOLD),
                ),
        );

        f.render_widget(sidebar, area);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header = Paragraph::new(self.mode.title())
            .style(
                Style::default()
                    .fg(theme::TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme::BORDER)),
            )
            .alignment(Alignment::Center);

        f.render_widget(header, area);
    }

    fn render_main_content(&self, f: &mut Frame, area: Rect) {
        match self.mode {
            AppMode::Home => self.render_home(f, area),
            AppMode::Characters => self.render_characters(f, area),
            AppMode::Episodes => render_browser(f, area, &self.episodes, format_record_row),
            AppMode::Locations => render_browser(f, area, &self.locations, format_record_row),
            AppMode::Organizations => {
                render_browser(f, area, &self.organizations, format_record_row)
            }
            AppMode::Titans => render_browser(f, area, &self.titans, format_record_row),
            AppMode::Help => self.render_help(f, area),
        }
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status = Paragraph::new(self.status_type.line(&self.status_message))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.status_type.color())),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(status, area);
    }

    fn render_home(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9), // Welcome card
                Constraint::Min(0),    // Record counts
            ])
            .margin(1)
            .split(area);

        let welcome_text = vec![
            Line::from("Welcome to titanwiki!"),
            Line::from(""),
            Line::from("Humanity lives behind three walls, hiding from the titans outside."),
            Line::from("Browse the characters, episodes, locations, organizations and"),
            Line::from("titans of Attack on Titan, straight from the community wiki."),
            Line::from(""),
            Line::from("• Press Tab to move between sections"),
            Line::from("• Press F1 for help"),
        ];

        let welcome = Paragraph::new(welcome_text)
            .style(Style::default().fg(theme::TEXT_PRIMARY))
            .block(
                Block::default()
                    .title("Welcome")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme::BORDER))
                    .title_style(Style::default().fg(theme::ACCENT)),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(welcome, chunks[0]);

        let counts: Vec<Line> = self
            .overview
            .iter()
            .map(|(endpoint, count)| {
                let value = match count {
                    OverviewCount::Loading => {
                        Span::styled("loading…", Style::default().fg(theme::TEXT_MUTED))
                    }
                    OverviewCount::Count(n) => Span::styled(
                        n.to_string(),
                        Style::default()
                            .fg(theme::SUCCESS)
                            .add_modifier(Modifier::BOLD),
                    ),
                    OverviewCount::Failed(message) => {
                        Span::styled(message.clone(), Style::default().fg(theme::ERROR))
                    }
                };
                Line::from(vec![
                    Span::styled(
                        format!("{:<16}", endpoint.title()),
                        Style::default().fg(theme::TEXT_SECONDARY),
                    ),
                    value,
                ])
            })
            .collect();

        let records = Paragraph::new(counts).block(
            Block::default()
                .title("Records (r to refresh)")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::BORDER))
                .title_style(Style::default().fg(theme::INFO)),
        );

        f.render_widget(records, chunks[1]);
    }

    fn render_characters(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Filters
                Constraint::Min(0),    // List
            ])
            .split(area);

        let editing = self.editing.is_some();
        let filter_bar = Paragraph::new(format_filter_bar(
            self.characters.inputs(),
            Some(self.filter_focus),
            self.editing.as_deref(),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if editing {
                    Style::default().fg(theme::BORDER_FOCUS)
                } else {
                    Style::default().fg(theme::BORDER)
                })
                .title("Filters (n name · o occupation · s status · g gender · c clear)"),
        );

        f.render_widget(filter_bar, chunks[0]);
        render_browser(f, chunks[1], &self.characters, format_character_row);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let area = area.inner(&Margin {
            horizontal: 1,
            vertical: 1,
        });

        let help = Paragraph::new(help_lines())
            .style(Style::default().fg(theme::TEXT_PRIMARY))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme::BORDER))
                    .title("Help"),
            );

        f.render_widget(help, area);
    }

    fn render_modals(&self, f: &mut Frame) {
        match self.mode {
            AppMode::Characters => render_details(f, &self.characters),
            AppMode::Episodes => render_details(f, &self.episodes),
            AppMode::Locations => render_details(f, &self.locations),
            AppMode::Organizations => render_details(f, &self.organizations),
            AppMode::Titans => render_details(f, &self.titans),
            AppMode::Home | AppMode::Help => {}
        }

        if self.modal_state == ModalState::HelpDialog {
            self.render_help_modal(f);
        }
    }

    fn render_help_modal(&self, f: &mut Frame) {
        let area = centered_rect(70, 80, f.size());
        f.render_widget(Clear, area);

        let mut lines = help_lines();
        lines.push(Line::from(""));
        lines.push(Line::from("Press any key to close"));

        let help = Paragraph::new(lines)
            .style(Style::default().fg(theme::TEXT_PRIMARY))
            .block(
                Block::default()
                    .title("Help")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme::INFO))
                    .border_type(BorderType::Rounded),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(help, area);
    }
}

fn help_lines() -> Vec<Line<'static>> {
    vec![
        Line::from("titanwiki - Attack on Titan wiki browser"),
        Line::from(""),
        Line::from("Global Controls:"),
        Line::from("  Tab/S-Tab - Navigate between sections"),
        Line::from("  q/Esc     - Quit application"),
        Line::from("  F1 or ?   - Show this help"),
        Line::from(""),
        Line::from("Lists:"),
        Line::from("  ↑↓ / jk   - Select record"),
        Line::from("  ←→ / hl   - Previous/next page"),
        Line::from("  Home/End  - First/last page"),
        Line::from("  Enter     - Show details"),
        Line::from("  r         - Retry after an error"),
        Line::from(""),
        Line::from("Characters:"),
        Line::from("  n or /    - Filter by name"),
        Line::from("  o         - Filter by occupation"),
        Line::from("  s / g     - Cycle status / gender"),
        Line::from("  c         - Clear filters"),
        Line::from(""),
        Line::from("Details:"),
        Line::from("  Esc/Enter - Close"),
    ]
}

fn render_browser<T: Resource>(
    f: &mut Frame,
    area: Rect,
    browser: &Browser<T>,
    row: fn(&T, bool) -> Line<'static>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Results
            Constraint::Length(3), // Page controls
        ])
        .split(area);

    let title = match browser.state() {
        LoadState::Ready(page) => format!("{} ({})", T::ENDPOINT.title(), page.info.count),
        _ => T::ENDPOINT.title().to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .title(title);

    match browser.state() {
        LoadState::Idle | LoadState::Loading => {
            let loading = Paragraph::new("Loading…")
                .style(Style::default().fg(theme::TEXT_MUTED))
                .block(block)
                .alignment(Alignment::Center);
            f.render_widget(loading, chunks[0]);
        }
        LoadState::Failed { message, transient } => {
            let panel = Paragraph::new(error_panel_lines(
                message,
                *transient,
                T::ENDPOINT.supports_filters(),
            ))
                .block(block.border_style(Style::default().fg(theme::ERROR)))
                .wrap(Wrap { trim: true });
            f.render_widget(panel, chunks[0]);
        }
        LoadState::Ready(page) if page.is_empty() => {
            let hint = if T::ENDPOINT.supports_filters() {
                "No results. Press c to clear filters."
            } else {
                "No results."
            };
            let empty = Paragraph::new(hint)
                .style(Style::default().fg(theme::TEXT_MUTED))
                .block(block)
                .alignment(Alignment::Center);
            f.render_widget(empty, chunks[0]);
        }
        LoadState::Ready(page) => {
            let items: Vec<ListItem> = page
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| ListItem::new(row(item, i == browser.selected())))
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            let mut list_state = ListState::default().with_selected(Some(browser.selected()));

            f.render_stateful_widget(list, chunks[0], &mut list_state);
        }
    }

    let controls = Paragraph::new(format_page_controls(
        &browser.page_controls(),
        browser.current_page(),
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER))
            .title("Pages"),
    )
    .alignment(Alignment::Center);

    f.render_widget(controls, chunks[1]);
}

fn render_details<T: Resource>(f: &mut Frame, browser: &Browser<T>) {
    let (Some(item), Some(source)) = (browser.modal().item(), browser.image_source()) else {
        return;
    };

    let area = centered_rect(70, 80, f.size());
    f.render_widget(Clear, area);

    let details = Paragraph::new(details_lines(item, &source, browser.image_status()))
        .style(Style::default().fg(theme::TEXT_PRIMARY))
        .block(
            Block::default()
                .title("Details (Esc to close)")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::ACCENT))
                .border_type(BorderType::Rounded),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(details, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_tracing() -> Result<()> {
    let dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("titanwiki");
    std::fs::create_dir_all(&dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("titanwiki.log"))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .compact()
            .init();
    }

    Ok(())
}

async fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        // Handle input
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key_event(key.code);
                }
            }
        }

        // Handle app events
        while let Ok(app_event) = app.event_receiver.try_recv() {
            app.handle_app_event(app_event);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    install()?;
    let _ = dotenvy::dotenv();
    init_tracing()?;

    let config = Config::load()?;
    let api: Arc<dyn WikiApi> = Arc::new(WikiClient::new(&config)?);
    tracing::info!(api_base = %config.api_base, "starting titanwiki");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config, api);
    let result = run(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
