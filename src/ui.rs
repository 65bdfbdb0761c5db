use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use trashflow::redistribution::has_transferable_load;
use trashflow::{
    AppConfig, Dashboard, FacilityRecord, Notification, NotificationKind, Presentation,
    RedistributionPlan, Status,
};

const TICK: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Monitor,
    Summary,
    Views,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    None,
    ByStatus(Status),
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Monitor => Page::Summary,
            Page::Summary => Page::Views,
            Page::Views => Page::Monitor,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Monitor => Page::Views,
            Page::Summary => Page::Monitor,
            Page::Views => Page::Summary,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Monitor => "Monitoring",
            Page::Summary => "Summary",
            Page::Views => "Views",
        }
    }
}

pub struct App {
    pub dashboard: Dashboard,
    pub state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
    pub filter: FilterType,
    /// Plan waiting for confirmation in the dialog
    pub pending_plan: Option<RedistributionPlan>,
    pub notification: Option<Notification>,
    /// Refresh lands when this passes; not cancellable
    pub refresh_due: Option<Instant>,
    refresh_delay: Duration,
    notification_ttl: Duration,
}

impl App {
    pub fn new(dashboard: Dashboard, config: &AppConfig) -> Self {
        let mut state = TableState::default();
        if !dashboard.records().is_empty() {
            state.select(Some(0));
        }

        Self {
            dashboard,
            state,
            current_page: Page::Monitor,
            show_detail: false,
            filter: FilterType::None,
            pending_plan: None,
            notification: None,
            refresh_due: None,
            refresh_delay: config.refresh_delay(),
            notification_ttl: config.notification_ttl(),
        }
    }

    pub fn visible_records(&self) -> Vec<&FacilityRecord> {
        self.dashboard
            .records()
            .iter()
            .filter(|r| match self.filter {
                FilterType::None => true,
                FilterType::ByStatus(status) => r.status() == status,
            })
            .collect()
    }

    pub fn selected_record(&self) -> Option<&FacilityRecord> {
        let visible = self.visible_records();
        self.state.selected().and_then(|i| visible.get(i).copied())
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn apply_filter(&mut self, filter: FilterType) {
        self.filter = filter;
        self.current_page = Page::Monitor;

        // Reset selection to first item
        if self.visible_records().is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn clear_filter(&mut self) {
        self.apply_filter(FilterType::None);
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn next(&mut self) {
        let len = self.visible_records().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible_records().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notification = Some(Notification::new(kind, message, self.notification_ttl));
    }

    /// Open the confirmation dialog for the selected facility
    pub fn request_redistribution(&mut self) {
        let Some(id) = self.selected_record().map(|r| r.id()) else {
            return;
        };
        self.open_plan(self.dashboard.plan_for(id));
    }

    /// Open the confirmation dialog for the first Overload facility
    pub fn simulate(&mut self) {
        self.open_plan(self.dashboard.plan_for_first_overload());
    }

    fn open_plan(&mut self, result: trashflow::RedistributionResult<RedistributionPlan>) {
        match result {
            Ok(plan) => self.pending_plan = Some(plan),
            Err(err) => self.notification = Some(Notification::from_error(&err, self.notification_ttl)),
        }
    }

    pub fn confirm_pending(&mut self) {
        let Some(plan) = self.pending_plan.take() else {
            return;
        };
        match self.dashboard.confirm(&plan) {
            Ok(()) => self.notify(
                NotificationKind::Success,
                format!("Redistribution done: {}% capacity moved", plan.amount_percent),
            ),
            Err(err) => self.notification = Some(Notification::from_error(&err, self.notification_ttl)),
        }
    }

    pub fn cancel_pending(&mut self) {
        self.pending_plan = None;
    }

    pub fn request_refresh(&mut self) {
        if self.refresh_due.is_none() {
            self.refresh_due = Some(Instant::now() + self.refresh_delay);
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh_due.is_some()
    }

    /// Land a due refresh and drop an expired notification
    pub fn on_tick(&mut self, now: Instant) {
        if self.refresh_due.is_some_and(|due| now >= due) {
            self.refresh_due = None;
            let summary = self.dashboard.refresh();
            self.notify(
                NotificationKind::Success,
                format!("Data refreshed: {} of {} facilities changed", summary.changed, summary.records),
            );
        }

        if self.notification.as_ref().is_some_and(|n| n.is_expired_at(now)) {
            self.notification = None;
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(%err, "ui loop failed");
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key.code, key.modifiers) {
                    return Ok(());
                }
            }
        }

        app.on_tick(Instant::now());
    }
}

/// Returns true when the app should quit
fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    if app.pending_plan.is_some() {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => app.confirm_pending(),
            KeyCode::Char('n') | KeyCode::Esc | KeyCode::Char('q') => app.cancel_pending(),
            _ => {}
        }
        return false;
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Enter => app.toggle_detail(),
        KeyCode::Tab => {
            if modifiers.contains(KeyModifiers::SHIFT) {
                app.previous_page();
            } else {
                app.next_page();
            }
        }
        KeyCode::BackTab => app.previous_page(),
        KeyCode::Char('r') => app.request_refresh(),
        KeyCode::Char('s') => app.simulate(),
        KeyCode::Char('x') if app.current_page == Page::Monitor => app.request_redistribution(),
        KeyCode::Char('c') => app.clear_filter(),
        KeyCode::Char('1') if app.current_page == Page::Views => app.clear_filter(),
        KeyCode::Char('2') if app.current_page == Page::Views => {
            app.apply_filter(FilterType::ByStatus(Status::Safe))
        }
        KeyCode::Char('3') if app.current_page == Page::Views => {
            app.apply_filter(FilterType::ByStatus(Status::Warning))
        }
        KeyCode::Char('4') if app.current_page == Page::Views => {
            app.apply_filter(FilterType::ByStatus(Status::Overload))
        }
        KeyCode::Down | KeyCode::Char('j') => app.next(),
        KeyCode::Up | KeyCode::Char('k') => app.previous(),
        KeyCode::Home => app.state.select(Some(0)),
        KeyCode::End => {
            let len = app.visible_records().len();
            if len > 0 {
                app.state.select(Some(len - 1));
            }
        }
        _ => {}
    }
    false
}

/// Only Overload rows with at least one whole percent to move get the action
fn can_redistribute(record: &FacilityRecord) -> bool {
    record.status() == Status::Overload && has_transferable_load(record.capacity_percent())
}

fn token_color(token: &str) -> Color {
    match token {
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "red" => Color::Red,
        _ => Color::Gray,
    }
}

fn status_color(status: Status) -> Color {
    token_color(status.color_token())
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail && app.current_page == Page::Monitor {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        match app.current_page {
            Page::Monitor => render_table(f, chunks[1], app),
            Page::Summary => render_summary(f, chunks[1], app),
            Page::Views => render_views(f, chunks[1], app),
        }
    }

    render_status_bar(f, chunks[2], app);

    if let Some(plan) = app.pending_plan {
        render_confirm_dialog(f, &plan, app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let summary = app.dashboard.summary();

    let pages = [Page::Monitor, Page::Summary, Page::Views];

    let mut tab_spans = vec![Span::styled(
        "TrashFlow Jogja  ",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    for status in Status::ALL {
        tab_spans.push(Span::styled(
            format!("{} {}  ", status.label(), summary.count(status)),
            Style::default().fg(status_color(status)),
        ));
    }

    if let Some(at) = app.dashboard.last_refreshed() {
        tab_spans.push(Span::styled(
            format!("| Updated {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(Line::from(tab_spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn capacity_bar(capacity_percent: u8, width: usize) -> String {
    let filled = usize::from(capacity_percent) * width / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["No", "District", "Waste Bank", "Capacity", "Status", "Action"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let records = app.visible_records();
    let rows = records.iter().enumerate().map(|(index, record)| {
        let color = status_color(record.status());
        let action = if can_redistribute(record) {
            Cell::from("Redistribusi [x]").style(Style::default().fg(Color::Green))
        } else {
            Cell::from("-").style(Style::default().fg(Color::DarkGray))
        };

        Row::new(vec![
            Cell::from(format!("{}", index + 1)),
            Cell::from(record.district().to_string()),
            Cell::from(truncate(record.name(), 28)),
            Cell::from(format!(
                "{} {:>3}%",
                capacity_bar(record.capacity_percent(), 20),
                record.capacity_percent()
            ))
            .style(Style::default().fg(color)),
            Cell::from(record.status().label()).style(
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            action,
        ])
        .height(1)
    });

    let title = match app.filter {
        FilterType::None => " Waste Bank Capacity ".to_string(),
        FilterType::ByStatus(status) => format!(" Waste Bank Capacity - {} ", status.label()),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(14),
            Constraint::Length(30),
            Constraint::Length(27),
            Constraint::Length(12),
            Constraint::Length(18),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = Vec::new();

    if let Some(note) = &app.notification {
        let color = token_color(note.kind.color_token());
        status_spans.push(Span::styled(
            format!(" {} ", note.message),
            Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD),
        ));
        status_spans.push(Span::raw(" | "));
    } else if app.is_refreshing() {
        status_spans.push(Span::styled(
            " Refreshing from server... ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
        ));
        status_spans.push(Span::raw(" | "));
    } else {
        let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
        status_spans.push(Span::styled(
            format!(" Row: {}/{} ", selected, app.visible_records().len()),
            Style::default().fg(Color::Cyan),
        ));
        status_spans.push(Span::raw(" | "));
    }

    for (key, label, color) in [
        ("x", " Redistribute | ", Color::Yellow),
        ("s", " Simulate | ", Color::Yellow),
        ("r", " Refresh | ", Color::Yellow),
        ("Tab", " Page | ", Color::Yellow),
        ("c", " Clear | ", Color::Yellow),
        ("q", " Quit", Color::Red),
    ] {
        status_spans.push(Span::styled(key, Style::default().fg(color)));
        status_spans.push(Span::raw(label));
    }

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let records = app.dashboard.records();

    let header_cells = ["Status", "Facilities", "Avg Capacity", "Range"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = Status::ALL.iter().map(|status| {
        let caps: Vec<u8> = records
            .iter()
            .filter(|r| r.status() == *status)
            .map(|r| r.capacity_percent())
            .collect();

        let avg = if caps.is_empty() {
            "-".to_string()
        } else {
            let total: u32 = caps.iter().map(|c| u32::from(*c)).sum();
            format!("{:.1}%", total as f64 / caps.len() as f64)
        };
        let range = match status {
            Status::Safe => "0-70%",
            Status::Warning => "71-85%",
            Status::Overload => "86-100%",
        };

        Row::new(vec![
            Cell::from(status.label()).style(Style::default().fg(status_color(*status))),
            Cell::from(format!("{}", caps.len())),
            Cell::from(avg),
            Cell::from(range),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Summary by Status "),
    );

    f.render_widget(table, area);
}

fn render_views(f: &mut Frame, area: Rect, app: &App) {
    let summary = app.dashboard.summary();

    let marker = |filter: FilterType| {
        if app.filter == filter {
            Span::styled("→", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            Span::raw(" ")
        }
    };

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Quick Views & Filters",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            marker(FilterType::None),
            Span::styled("1", Style::default().fg(Color::Yellow)),
            Span::raw(". All facilities        "),
            Span::styled(format!("{:>3}", summary.total), Style::default().fg(Color::White)),
        ]),
    ];

    for (key, status) in ["2", "3", "4"].iter().zip(Status::ALL) {
        content.push(Line::from(vec![
            Span::raw("  "),
            marker(FilterType::ByStatus(status)),
            Span::styled(*key, Style::default().fg(Color::Yellow)),
            Span::raw(format!(". {:<22}", status.label())),
            Span::styled(
                format!("{:>3}", summary.count(status)),
                Style::default().fg(status_color(status)),
            ),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "  Hint: press 1-4 to filter, c to clear",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Views - Filter by Status "),
    );

    f.render_widget(paragraph, area);
}

fn detail_line<'a>(label: &'a str, value: String, color: Color) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(value, Style::default().fg(color)),
    ])
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Facility Details ");

    let Some(record) = app.selected_record() else {
        f.render_widget(Paragraph::new("No facility selected").block(block), area);
        return;
    };

    let presentation: Presentation = record.status().presentation();
    let color = token_color(presentation.color);

    let content = vec![
        Line::from(""),
        detail_line("  Name: ", record.name().to_string(), Color::White),
        Line::from(""),
        detail_line("  District: ", record.district().to_string(), Color::White),
        Line::from(""),
        detail_line("  Capacity: ", format!("{}%", record.capacity_percent()), color),
        Line::from(""),
        detail_line("  Status: ", presentation.label.to_string(), color),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(""),
        Line::from(Span::styled(
            "  Press Enter to close",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height: height.min(area.height),
    }
}

fn render_confirm_dialog(f: &mut Frame, plan: &RedistributionPlan, app: &App) {
    let registry = app.dashboard.registry();
    let (Some(source), Some(target)) = (
        registry.find_by_id(plan.source_id),
        registry.find_by_id(plan.target_id),
    ) else {
        return;
    };

    let source_after = plan.resulting_source_status();
    let target_after = plan.resulting_target_status();

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Source (Overload):",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("    {} - {}", source.name(), source.district())),
        Line::from(format!("    Current capacity: {}%", source.capacity_percent())),
        Line::from(""),
        Line::from(Span::styled(
            format!("    ↓ moving {}% capacity", plan.amount_percent),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Target (Safe):",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("    {} - {}", target.name(), target.district())),
        Line::from(format!("    Current capacity: {}%", target.capacity_percent())),
        Line::from(""),
        Line::from(Span::styled(
            "  After redistribution:",
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw(format!("    Source: {}% ", plan.resulting_source_capacity)),
            Span::styled(source_after.label(), Style::default().fg(status_color(source_after))),
        ]),
        Line::from(vec![
            Span::raw(format!("    Target: {}% ", plan.resulting_target_capacity)),
            Span::styled(target_after.label(), Style::default().fg(status_color(target_after))),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("y", Style::default().fg(Color::Yellow)),
            Span::raw(" Confirm   "),
            Span::styled("n", Style::default().fg(Color::Yellow)),
            Span::raw(" Cancel"),
        ]),
    ];

    let area = centered_rect(60, content.len() as u16 + 2, f.size());
    let dialog = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Redistribution Simulation "),
    );

    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use trashflow::{FacilityRegistry, Refresher};

    fn app() -> App {
        let config = AppConfig {
            refresh_delay_ms: 1500,
            notification_ttl_ms: 3000,
            ..AppConfig::default()
        };
        App::new(Dashboard::new(FacilityRegistry::default(), Refresher::seeded(2, 5)), &config)
    }

    #[test]
    fn test_filter_resets_selection() {
        let mut app = app();
        app.state.select(Some(10));
        app.apply_filter(FilterType::ByStatus(Status::Overload));

        assert_eq!(app.visible_records().len(), 3);
        assert_eq!(app.state.selected(), Some(0));
        assert_eq!(app.selected_record().unwrap().name(), "Bank Sampah Merapi");
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        app.previous();
        assert_eq!(app.state.selected(), Some(13));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_simulate_confirm_flow() {
        let mut app = app();
        app.simulate();
        assert!(app.pending_plan.is_some());

        handle_key(&mut app, KeyCode::Char('y'), KeyModifiers::NONE);

        assert!(app.pending_plan.is_none());
        assert_eq!(app.notification.as_ref().unwrap().kind, NotificationKind::Success);
        assert_eq!(app.dashboard.registry().find_by_id(3).unwrap().capacity_percent(), 93);
    }

    #[test]
    fn test_cancel_leaves_registry_untouched() {
        let mut app = app();
        app.simulate();
        handle_key(&mut app, KeyCode::Char('n'), KeyModifiers::NONE);

        assert!(app.pending_plan.is_none());
        assert_eq!(app.dashboard.registry().find_by_id(3).unwrap().capacity_percent(), 95);
    }

    #[test]
    fn test_redistribute_safe_row_warns() {
        let mut app = app();
        // Row 0 is Umbulharjo at 65%
        app.request_redistribution();

        assert!(app.pending_plan.is_none());
        assert_eq!(app.notification.as_ref().unwrap().kind, NotificationKind::Warning);
    }

    #[test]
    fn test_refresh_lands_after_delay() {
        let mut app = app();
        let start = Instant::now();
        app.request_refresh();

        app.on_tick(start);
        assert!(app.is_refreshing());

        app.on_tick(start + Duration::from_secs(2));
        assert!(!app.is_refreshing());
        assert!(app.dashboard.last_refreshed().is_some());
    }

    #[test]
    fn test_notification_auto_dismiss() {
        let mut app = app();
        app.notify(NotificationKind::Success, "ok");

        app.on_tick(Instant::now() + Duration::from_secs(4));
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_quit_closes_dialog_first() {
        let mut app = app();
        app.simulate();

        assert!(!handle_key(&mut app, KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(handle_key(&mut app, KeyCode::Char('q'), KeyModifiers::NONE));
    }

    #[test]
    fn test_redistribute_action_only_with_transferable_load() {
        let app = app();
        let registry = app.dashboard.registry();

        assert!(can_redistribute(registry.find_by_id(3).unwrap()));
        assert!(!can_redistribute(registry.find_by_id(7).unwrap()));
        assert!(!can_redistribute(registry.find_by_id(1).unwrap()));
    }

    #[test]
    fn test_capacity_bar_width() {
        assert_eq!(capacity_bar(50, 20).chars().count(), 20);
        assert_eq!(capacity_bar(100, 20), "█".repeat(20));
    }
}
