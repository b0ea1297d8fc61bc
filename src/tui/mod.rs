//! Ratatui-based terminal UI.
//!
//! A symbol input, the company and valuation-metric panels, the transposed
//! growth table, two growth bar charts and a parameter panel whose sliders
//! re-value the loaded record without fetching again.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table},
};
use tracing::info;

use crate::config::Settings;
use crate::data::{Extractor, ScreenerClient};
use crate::domain::{GrowthPeriod, GrowthSeries, StockRecord};
use crate::error::{AppError, ErrorKind};
use crate::report::fmt_number;
use crate::valuation::Param;

mod plotters_chart;
pub mod state;

use plotters_chart::GrowthBarChart;
use state::{Action, Key, LoadState, Session};

/// Start the TUI, optionally loading `symbol` right away.
pub fn run(settings: &Settings, symbol: Option<&str>) -> Result<(), AppError> {
    let extractor = Extractor::new(ScreenerClient::new(settings)?, settings.period.clone());

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| terminal_error("Failed to initialize terminal", e))?;

    let mut app = App {
        session: Session::new(symbol),
        extractor,
    };
    if let Action::Fetch(symbol) = app.session.initial_action() {
        app.draw_now(&mut terminal)?;
        app.fetch(&symbol);
    }
    app.event_loop(&mut terminal)
}

fn terminal_error(what: &str, e: io::Error) -> AppError {
    AppError::new(ErrorKind::Terminal, format!("{what}: {e}"))
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| terminal_error("Failed to enable raw mode", e))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(terminal_error("Failed to enter alternate screen", e));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    session: Session,
    extractor: Extractor<ScreenerClient>,
}

impl App {
    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                self.draw_now(terminal)?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100)).map_err(|e| terminal_error("Event poll error", e))? {
                continue;
            }

            match event::read().map_err(|e| terminal_error("Event read error", e))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match self.session.handle_key(map_key(key.code)) {
                        Action::Quit => break,
                        Action::Fetch(symbol) => {
                            // Show the "Fetching" status before blocking on the request.
                            self.draw_now(terminal)?;
                            self.fetch(&symbol);
                        }
                        Action::Dump => self.dump(),
                        Action::None => {}
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn draw_now<B: ratatui::backend::Backend>(&self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        terminal
            .draw(|f| self.draw(f))
            .map_err(|e| terminal_error("Terminal draw error", e))?;
        Ok(())
    }

    /// Fetch and parse separately so a page that fails extraction stays dumpable.
    fn fetch(&mut self, symbol: &str) {
        match self.extractor.fetch_page(symbol) {
            Ok(page) => {
                let parsed = self.extractor.parse(&page);
                if let Err(err) = &parsed {
                    info!(symbol, error = %err, "tui parse failed");
                }
                self.session.apply_page(page, parsed);
            }
            Err(err) => {
                info!(symbol, error = %err, "tui fetch failed");
                self.session.apply_fetch_error(err);
            }
        }
    }

    fn dump(&mut self) {
        let Some(page) = self.session.page() else {
            return;
        };
        let dir = Path::new(crate::debug::DEFAULT_DEBUG_DIR);
        let status = match crate::debug::write_page_dump(dir, page, self.extractor.period()) {
            Ok(path) => format!("Wrote page dump: {}", path.display()),
            Err(err) => format!("Dump failed: {err}"),
        };
        self.session.status = status;
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let session = &self.session;
        let input_style = if session.editing_symbol {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if session.editing_symbol { "_" } else { "" };
        let line = Line::from(vec![
            Span::styled("sv", Style::default().fg(Color::Cyan)),
            Span::raw(" | symbol: "),
            Span::styled(format!("{}{cursor}", session.symbol_input), input_style),
            Span::styled(
                format!("  ({})", self.extractor.period().fiscal_label()),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        match &self.session.load {
            LoadState::Loaded(loaded) => self.draw_record(frame, cols[0], &loaded.record),
            LoadState::Idle => draw_message(frame, cols[0], "No company loaded.", Color::Gray),
            LoadState::Failed { message, page } => {
                let text = if page.is_some() {
                    format!("{message}\n\nPress d to dump the fetched page.")
                } else {
                    message.clone()
                };
                draw_message(frame, cols[0], &text, Color::Red);
            }
        }

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(Param::ALL.len() as u16 + 2), Constraint::Min(0)])
            .split(cols[1]);
        self.draw_params(frame, right[0]);
        self.draw_valuation(frame, right[1]);
    }

    fn draw_record(&self, frame: &mut ratatui::Frame<'_>, area: Rect, record: &StockRecord) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Length(5), Constraint::Min(0)])
            .split(area);

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);
        let company = vec![
            ("Symbol", record.symbol.clone()),
            ("Name", record.name.clone()),
            ("Price", fmt_number(record.price)),
            ("Market Cap (Cr.)", fmt_number(record.market_cap)),
        ];
        let metrics = vec![
            (format!("{} PE", record.fiscal_label), format!("{:.2}", record.trailing_pe)),
            ("5-yr median RoCE %".to_string(), fmt_number(record.median_roce)),
            ("Net Profit (Cr.)".to_string(), fmt_number(record.net_profit)),
        ];
        frame.render_widget(
            label_value_panel("Company", company.iter().map(|(l, v)| (l.to_string(), v.clone()))),
            panels[0],
        );
        frame.render_widget(label_value_panel("Valuation Metrics", metrics.into_iter()), panels[1]);

        frame.render_widget(growth_table(record), rows[1]);

        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);
        draw_growth_chart(frame, charts[0], "Sales Growth %", &record.sales_growth, RGBColor(0, 255, 255));
        draw_growth_chart(frame, charts[1], "Profit Growth %", &record.profit_growth, RGBColor(0, 255, 0));
    }

    fn draw_params(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let inputs = &self.session.inputs;
        let items: Vec<ListItem> = Param::ALL
            .iter()
            .map(|param| {
                let spec = param.spec();
                ListItem::new(format!(
                    "{:<36} {:>6}  [{}..{}]",
                    spec.label,
                    spec.format(inputs.get(*param)),
                    spec.format(spec.min),
                    spec.format(spec.max),
                ))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("DCF Model").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        if !self.session.editing_symbol {
            state.select(Some(self.session.selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_valuation(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Overvaluation").borders(Borders::ALL);
        let mut lines: Vec<Line> = Vec::new();

        match self.session.valuation() {
            None => lines.push(Line::from(Span::styled(
                "Load a company to value it.",
                Style::default().fg(Color::Gray),
            ))),
            Some(Ok(v)) => {
                lines.push(Line::from(format!("Observed PE:      {:.2}", v.observed_pe)));
                lines.push(Line::from(format!("Intrinsic PE:     {:.2}", v.intrinsic_pe)));
                let over_color = if v.degree_of_overvaluation > 0.0 { Color::Red } else { Color::Green };
                lines.push(Line::from(vec![
                    Span::raw("Overvaluation:    "),
                    Span::styled(
                        format!("{:.2}%", v.degree_of_overvaluation * 100.0),
                        Style::default().fg(over_color).add_modifier(Modifier::BOLD),
                    ),
                ]));
                lines.push(Line::from(format!("Horizon (years):  {}", v.horizon_years)));
                let fade: Vec<String> = v.fade_growth_rates.iter().map(|r| format!("{r:.2}")).collect();
                lines.push(Line::from(format!("Fade growth (%):  {}", fade.join(", "))));
                for warning in &v.warnings {
                    lines.push(warning_line(&warning.to_string()));
                }
            }
            Some(Err(err)) => lines.push(warning_line(&format!("valuation unavailable: {err}"))),
        }

        let p = Paragraph::new(Text::from(lines))
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(block);
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = if self.session.editing_symbol {
            "type symbol  Enter fetch  Esc cancel"
        } else {
            "↑/↓ select  ←/→ adjust  s edit symbol  r reload  d dump page  q quit"
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.session.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        _ => Key::Other,
    }
}

fn warning_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("Warning: {text}"),
        Style::default().fg(Color::Yellow),
    ))
}

fn draw_message(frame: &mut ratatui::Frame<'_>, area: Rect, message: &str, color: Color) {
    let p = Paragraph::new(message.to_string())
        .style(Style::default().fg(color))
        .wrap(ratatui::widgets::Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn label_value_panel(title: &str, rows: impl Iterator<Item = (String, String)>) -> Paragraph<'static> {
    let lines: Vec<Line> = rows
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:<20}"), Style::default().fg(Color::Gray)),
                Span::raw(value),
            ])
        })
        .collect();
    Paragraph::new(Text::from(lines)).block(Block::default().title(title.to_string()).borders(Borders::ALL))
}

/// Growth table with periods as columns and the two series as rows.
fn growth_table(record: &StockRecord) -> Table<'static> {
    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(GrowthPeriod::ALL.iter().map(|p| Cell::from(p.display_name()))),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let row = |label: &'static str, series: &GrowthSeries| {
        Row::new(
            std::iter::once(Cell::from(label))
                .chain(series.iter().map(|(_, v)| Cell::from(format!("{v}%")))),
        )
    };

    let widths = [
        Constraint::Length(16),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
    ];
    Table::new(
        vec![row("Sales Growth", &record.sales_growth), row("Profit Growth", &record.profit_growth)],
        widths,
    )
    .header(header)
    .block(Block::default().title("Compounded Growth").borders(Borders::ALL))
}

fn draw_growth_chart(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    series: &GrowthSeries,
    color: RGBColor,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);
    frame.render_widget(GrowthBarChart { series, color }, inner);
}
