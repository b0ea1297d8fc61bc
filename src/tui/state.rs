//! TUI session state, kept free of terminal I/O so key handling is testable.

use crate::data::{CompanyPage, ScrapeError};
use crate::domain::{StockRecord, ValuationInputs, ValuationOutputs};
use crate::valuation::{Param, ValuationError};

/// What the record panels show.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Nothing fetched for the current symbol text.
    Idle,
    Loaded(Box<Loaded>),
    /// Fetch or parse failure; no partial record is kept. `page` is set when
    /// the fetch succeeded and only extraction failed.
    Failed {
        message: String,
        page: Option<Box<CompanyPage>>,
    },
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub record: StockRecord,
    pub page: CompanyPage,
}

/// Side effects requested by a key press; the caller performs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Fetch(String),
    Dump,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub symbol_input: String,
    pub editing_symbol: bool,
    pub inputs: ValuationInputs,
    pub selected: usize,
    pub load: LoadState,
    pub status: String,
}

impl Session {
    pub fn new(symbol: Option<&str>) -> Self {
        let symbol_input = symbol.map(|s| s.trim().to_string()).unwrap_or_default();
        let editing_symbol = symbol_input.is_empty();
        Self {
            symbol_input,
            editing_symbol,
            inputs: ValuationInputs::default(),
            selected: 0,
            load: LoadState::Idle,
            status: if editing_symbol {
                "Type a symbol and press Enter.".to_string()
            } else {
                String::new()
            },
        }
    }

    /// A symbol given on the command line is fetched right away.
    pub fn initial_action(&mut self) -> Action {
        if self.editing_symbol {
            Action::None
        } else {
            self.fetch_action()
        }
    }

    pub fn selected_param(&self) -> Param {
        Param::ALL[self.selected.min(Param::ALL.len() - 1)]
    }

    pub fn loaded(&self) -> Option<&Loaded> {
        match &self.load {
            LoadState::Loaded(loaded) => Some(loaded),
            _ => None,
        }
    }

    /// The last fetched page, whether or not it parsed.
    pub fn page(&self) -> Option<&CompanyPage> {
        match &self.load {
            LoadState::Loaded(loaded) => Some(&loaded.page),
            LoadState::Failed { page, .. } => page.as_deref(),
            LoadState::Idle => None,
        }
    }

    /// Valuation of the loaded record under the current inputs.
    pub fn valuation(&self) -> Option<Result<ValuationOutputs, ValuationError>> {
        self.loaded()
            .map(|l| crate::valuation::value(l.record.trailing_pe, &self.inputs))
    }

    pub fn handle_key(&mut self, key: Key) -> Action {
        if self.editing_symbol {
            return self.handle_symbol_key(key);
        }

        match key {
            Key::Char('q') => return Action::Quit,
            Key::Char('/') | Key::Char('s') => {
                self.editing_symbol = true;
                self.status = "Editing symbol. Enter to fetch, Esc to cancel.".to_string();
            }
            Key::Up => self.selected = self.selected.saturating_sub(1),
            Key::Down => self.selected = (self.selected + 1).min(Param::ALL.len() - 1),
            Key::Left => self.adjust(-1),
            Key::Right => self.adjust(1),
            Key::Enter | Key::Char('r') => return self.fetch_action(),
            Key::Char('d') => {
                if self.page().is_some() {
                    return Action::Dump;
                }
                self.status = "No fetched page to dump.".to_string();
            }
            _ => {}
        }
        Action::None
    }

    fn handle_symbol_key(&mut self, key: Key) -> Action {
        match key {
            Key::Esc => {
                self.editing_symbol = false;
                self.status = "Symbol edit canceled.".to_string();
            }
            Key::Enter => {
                self.editing_symbol = false;
                return self.fetch_action();
            }
            Key::Backspace => {
                if self.symbol_input.pop().is_some() {
                    self.on_symbol_edit();
                }
            }
            // Kept verbatim, like `sv show SYMBOL`.
            Key::Char(c) if !c.is_whitespace() && !c.is_control() => {
                self.symbol_input.push(c);
                self.on_symbol_edit();
            }
            _ => {}
        }
        Action::None
    }

    /// A record only ever belongs to the symbol it was fetched for.
    fn on_symbol_edit(&mut self) {
        self.load = LoadState::Idle;
    }

    fn fetch_action(&mut self) -> Action {
        let symbol = self.symbol_input.trim().to_string();
        if symbol.is_empty() {
            self.editing_symbol = true;
            self.status = "Type a symbol and press Enter.".to_string();
            return Action::None;
        }
        self.status = format!("Fetching {symbol}...");
        Action::Fetch(symbol)
    }

    fn adjust(&mut self, steps: i32) {
        let param = self.selected_param();
        self.inputs.nudge(param, steps);
        let spec = param.spec();
        self.status = format!("{}: {}", spec.label, spec.format(self.inputs.get(param)));
    }

    /// A page arrived; `parsed` is the extraction outcome for it.
    pub fn apply_page(&mut self, page: CompanyPage, parsed: Result<StockRecord, ScrapeError>) {
        match parsed {
            Ok(record) => {
                self.status = format!("Loaded {} ({}).", record.symbol, page.fetched_at.format("%H:%M:%S"));
                self.load = LoadState::Loaded(Box::new(Loaded { record, page }));
            }
            Err(err) => {
                self.status = format!("Parse failed: {err} (d dumps the page)");
                self.load = LoadState::Failed {
                    message: err.to_string(),
                    page: Some(Box::new(page)),
                };
            }
        }
    }

    pub fn apply_fetch_error(&mut self, err: ScrapeError) {
        self.status = format!("Fetch failed: {err}");
        self.load = LoadState::Failed {
            message: err.to_string(),
            page: None,
        };
    }
}

/// Terminal-independent key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Backspace,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn page(html: &str) -> CompanyPage {
        CompanyPage {
            symbol: "RELIANCE".to_string(),
            url: "https://www.screener.in/company/RELIANCE/".to_string(),
            html: html.to_string(),
            fetched_at: Local::now(),
        }
    }

    fn session_with_page(html: &str) -> Session {
        let mut session = Session::new(Some("RELIANCE"));
        let page = page(html);
        let parsed = crate::data::parse_company_page(&page.symbol, &page.html, &Default::default());
        session.apply_page(page, parsed);
        session
    }

    fn loaded_session() -> Session {
        session_with_page(include_str!("../data/fixtures/company_page.html"))
    }

    #[test]
    fn starts_in_symbol_edit_without_a_symbol() {
        let session = Session::new(None);
        assert!(session.editing_symbol);
        assert!(matches!(session.load, LoadState::Idle));

        let mut session = Session::new(Some(" TCS "));
        assert!(!session.editing_symbol);
        assert_eq!(session.symbol_input, "TCS");
        assert_eq!(session.initial_action(), Action::Fetch("TCS".to_string()));
        assert_eq!(Session::new(None).initial_action(), Action::None);
    }

    #[test]
    fn enter_requests_a_fetch_of_the_typed_symbol() {
        let mut session = Session::new(None);
        for c in "M&M".chars() {
            assert_eq!(session.handle_key(Key::Char(c)), Action::None);
        }
        assert_eq!(session.handle_key(Key::Enter), Action::Fetch("M&M".to_string()));
        assert!(!session.editing_symbol);
    }

    #[test]
    fn typed_symbol_is_kept_verbatim() {
        let mut session = Session::new(None);
        for c in "infy".chars() {
            session.handle_key(Key::Char(c));
        }
        session.handle_key(Key::Char(' '));
        assert_eq!(session.handle_key(Key::Enter), Action::Fetch("infy".to_string()));
    }

    #[test]
    fn empty_symbol_does_not_fetch() {
        let mut session = Session::new(None);
        assert_eq!(session.handle_key(Key::Enter), Action::None);
        assert!(session.editing_symbol);
    }

    #[test]
    fn editing_symbol_resets_load_state() {
        let mut session = loaded_session();
        assert!(session.loaded().is_some());

        session.handle_key(Key::Char('s'));
        session.handle_key(Key::Backspace);
        assert!(matches!(session.load, LoadState::Idle));
        assert_eq!(session.symbol_input, "RELIANC");
    }

    #[test]
    fn failed_fetch_keeps_no_record() {
        let mut session = loaded_session();
        session.apply_fetch_error(ScrapeError::Status {
            symbol: "NOPE".to_string(),
            status: 404,
        });
        assert!(session.loaded().is_none());
        assert!(session.valuation().is_none());
        assert!(session.page().is_none());
        let LoadState::Failed { message, .. } = &session.load else {
            panic!("expected failure");
        };
        assert!(message.contains("HTTP 404"));
        assert_eq!(session.handle_key(Key::Char('d')), Action::None);
    }

    #[test]
    fn page_that_fails_to_parse_can_still_be_dumped() {
        let mut session = session_with_page("<html><h1>Redesigned</h1></html>");
        assert!(session.loaded().is_none());
        assert!(session.valuation().is_none());
        let LoadState::Failed { message, page } = &session.load else {
            panic!("expected failure");
        };
        assert!(message.contains("unexpected page format"));
        assert!(page.is_some());

        assert_eq!(session.handle_key(Key::Char('d')), Action::Dump);
        assert!(session.page().is_some_and(|p| p.html.contains("Redesigned")));
    }

    #[test]
    fn sliders_clamp_at_their_bounds() {
        let mut session = loaded_session();
        // Cost of capital: 12 -> 16 max in 0.5 steps.
        for _ in 0..20 {
            session.handle_key(Key::Right);
        }
        assert_eq!(session.inputs.cost_of_capital, 16.0);

        session.handle_key(Key::Down);
        session.handle_key(Key::Down);
        session.handle_key(Key::Down);
        assert_eq!(session.selected_param(), Param::HighGrowthYears);
        for _ in 0..30 {
            session.handle_key(Key::Left);
        }
        assert_eq!(session.inputs.high_growth_years, 10);

        for _ in 0..10 {
            session.handle_key(Key::Down);
        }
        assert_eq!(session.selected_param(), Param::TerminalGrowthRate);
    }

    #[test]
    fn valuation_error_keeps_the_record() {
        let mut session = loaded_session();
        // RoCE 20 -> 12 equals the high-growth rate.
        session.handle_key(Key::Down);
        for _ in 0..8 {
            session.handle_key(Key::Left);
        }
        assert_eq!(session.inputs.roce, 12.0);
        assert!(matches!(session.valuation(), Some(Err(ValuationError::DegenerateSpread { .. }))));
        assert!(session.loaded().is_some());
    }

    #[test]
    fn dump_needs_a_fetched_page() {
        let mut session = Session::new(Some("TCS"));
        assert_eq!(session.handle_key(Key::Char('d')), Action::None);
        assert_eq!(loaded_session().handle_key(Key::Char('d')), Action::Dump);
    }

    #[test]
    fn q_quits_outside_symbol_edit_only() {
        let mut session = Session::new(None);
        assert_eq!(session.handle_key(Key::Char('q')), Action::None);
        assert_eq!(session.symbol_input, "q");
        session.handle_key(Key::Esc);
        assert_eq!(session.handle_key(Key::Char('q')), Action::Quit);
    }
}
