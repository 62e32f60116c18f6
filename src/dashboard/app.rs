//! Application state and the terminal event loop.

use std::io::{self, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use crossterm::{
    cursor::Show,
    event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{backend::CrosstermBackend, Terminal};

use crate::categorizer::{categorize, out_of_domain_count, CategorizedRecord};
use crate::config::Config;
use crate::dataset::Dataset;

use super::pages::{
    calculator::CalculatorState, dataset_view::DatasetViewState, graphs::GraphsState, render_app,
};

/// Owns the alternate screen (and raw mode, when `raw_mode` is set) and
/// gives both back on drop, whichever way `run` exits.
struct TerminalGuard<W: Write> {
    out: W,
    raw_mode: bool,
}

impl<W: Write> TerminalGuard<W> {
    fn enter(out: W, raw_mode: bool) -> io::Result<Self> {
        let mut guard = Self { out, raw_mode };
        execute!(guard.out, EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if self.raw_mode {
            if let Err(e) = disable_raw_mode() {
                tracing::error!("Failed to disable raw mode: {}", e);
            }
        }
        if let Err(e) = execute!(self.out, LeaveAlternateScreen, Show) {
            tracing::error!("Failed to restore the terminal: {}", e);
        }
    }
}

enum Event<I> {
    Input(I),
    Tick,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Dataset,
    Graphs,
    Calculator,
}

impl From<MenuItem> for usize {
    fn from(input: MenuItem) -> usize {
        match input {
            MenuItem::Dataset => 0,
            MenuItem::Graphs => 1,
            MenuItem::Calculator => 2,
        }
    }
}

impl MenuItem {
    fn next(self) -> Self {
        match self {
            MenuItem::Dataset => MenuItem::Graphs,
            MenuItem::Graphs => MenuItem::Calculator,
            MenuItem::Calculator => MenuItem::Dataset,
        }
    }
}

pub struct App {
    pub(crate) dataset: Dataset,
    pub(crate) categorized: Vec<CategorizedRecord>,
    pub(crate) out_of_domain: usize,
    pub(crate) active_menu_item: MenuItem,
    pub(crate) dataset_view: DatasetViewState,
    pub(crate) graphs: GraphsState,
    pub(crate) calculator: CalculatorState,
    tick_rate: Duration,
    should_quit: bool,
}

impl App {
    /// Build every page from an already loaded dataset.
    pub fn new(dataset: Dataset, config: &Config) -> Self {
        let categorized = categorize(dataset.records());
        let out_of_domain = out_of_domain_count(&categorized);
        if out_of_domain > 0 {
            tracing::warn!(
                "{} of {} records fall outside the age/BMI buckets and will never match a query",
                out_of_domain,
                categorized.len()
            );
        }
        tracing::info!("Categorized {} records", categorized.len());

        let graphs = GraphsState::new(&dataset);
        let calculator = CalculatorState::new(&categorized);

        Self {
            dataset,
            categorized,
            out_of_domain,
            active_menu_item: MenuItem::Dataset,
            dataset_view: DatasetViewState::default(),
            graphs,
            calculator,
            tick_rate: config.tick_rate(),
            should_quit: false,
        }
    }

    pub fn active_menu_item(&self) -> MenuItem {
        self.active_menu_item
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Take over the terminal until the user quits.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        let (tx, rx) = mpsc::channel();
        let tick_rate = self.tick_rate;
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or_else(|| Duration::from_secs(0));

                match event::poll(timeout) {
                    Ok(true) => {
                        if let Ok(CEvent::Key(key)) = event::read() {
                            if tx.send(Event::Input(key)).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        tracing::error!("Terminal input polling failed: {}", e);
                        break;
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if tx.send(Event::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        enable_raw_mode()?;
        let _guard = TerminalGuard::enter(io::stdout(), true)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        self.main_loop(&mut terminal, &rx)
    }

    fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        rx: &mpsc::Receiver<Event<KeyEvent>>,
    ) -> Result<()> {
        loop {
            terminal.draw(|f| render_app(f, self))?;

            match rx.recv().map_err(|_| anyhow!("Terminal input thread stopped"))? {
                Event::Input(key) if key.kind != KeyEventKind::Release => {
                    self.handle_key(key.code, key.modifiers)
                }
                Event::Input(_) | Event::Tick => {}
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.active_menu_item = MenuItem::Dataset;
                return;
            }
            KeyCode::Char('g') | KeyCode::Char('G') => {
                self.active_menu_item = MenuItem::Graphs;
                return;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.active_menu_item = MenuItem::Calculator;
                return;
            }
            KeyCode::Tab => {
                self.active_menu_item = self.active_menu_item.next();
                return;
            }
            _ => {}
        }

        match self.active_menu_item {
            MenuItem::Dataset => self.handle_dataset_key(key),
            MenuItem::Graphs => self.handle_graphs_key(key),
            MenuItem::Calculator => self.handle_calculator_key(key),
        }
    }

    fn handle_dataset_key(&mut self, key: KeyCode) {
        let rows = self.dataset.len();
        let view = &mut self.dataset_view;
        match key {
            KeyCode::Down | KeyCode::Char('j') => view.scroll_down(1, rows),
            KeyCode::Up | KeyCode::Char('k') => view.scroll_up(1),
            KeyCode::PageDown => view.page_down(rows),
            KeyCode::PageUp => view.page_up(),
            KeyCode::Home => view.first(),
            KeyCode::End => view.last(rows),
            _ => {}
        }
    }

    fn handle_graphs_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Right | KeyCode::Char('l') => self.graphs.next(),
            KeyCode::Left | KeyCode::Char('h') => self.graphs.previous(),
            _ => {}
        }
    }

    fn handle_calculator_key(&mut self, key: KeyCode) {
        let data = &self.categorized;
        let form = &mut self.calculator;
        match key {
            KeyCode::Down => form.next_field(),
            KeyCode::Up => form.prev_field(),
            KeyCode::Right | KeyCode::Enter => form.step_value(true, data),
            KeyCode::Left => form.step_value(false, data),
            KeyCode::Char('s') | KeyCode::Char('S') => {
                form.load_sample(data, &mut rand::thread_rng())
            }
            KeyCode::Char('r') | KeyCode::Char('R') => form.reset(data),
            KeyCode::Char(c) if c.is_ascii_digit() => form.input_digit(c, data),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::dataset::{Record, Region, Sex, Smoker};
    use crate::estimator::Estimate;
    use tui::backend::TestBackend;

    fn record(age: u32, bmi: f64, charges: f64) -> Record {
        Record {
            age,
            sex: Sex::Male,
            bmi,
            children: 0,
            smoker: Smoker::Yes,
            region: Region::Southeast,
            charges,
        }
    }

    fn test_app() -> App {
        let records = vec![
            record(55, 32.0, 30000.0),
            record(60, 35.5, 40000.0),
            record(18, 24.0, 1725.55),
            record(25, 17.0, 2000.0),
        ];
        App::new(Dataset::from_records(records, "memory"), &Config::default())
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 42)).expect("terminal");
        terminal.draw(|f| render_app(f, app)).expect("draw");
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(&buffer.get(x, y).symbol);
            }
            text.push('\n');
        }
        text
    }

    /// Records what reaches it; fails the first `failures` writes.
    #[derive(Clone, Default)]
    struct SharedWriter {
        bytes: Rc<RefCell<Vec<u8>>>,
        failures: Rc<Cell<usize>>,
    }

    impl Write for SharedWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                return Err(io::Error::new(io::ErrorKind::Other, "refused"));
            }
            self.bytes.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn leave_sequence() -> Vec<u8> {
        let mut expected = Vec::new();
        execute!(expected, LeaveAlternateScreen, Show).expect("encode");
        expected
    }

    #[test]
    fn test_guard_restores_screen_on_drop() {
        let writer = SharedWriter::default();
        {
            let _guard = TerminalGuard::enter(writer.clone(), false).expect("enter");
        }
        let bytes = writer.bytes.borrow();
        assert!(bytes.ends_with(&leave_sequence()));
    }

    #[test]
    fn test_guard_restores_screen_when_entering_fails() {
        let writer = SharedWriter::default();
        writer.failures.set(1);

        assert!(TerminalGuard::enter(writer.clone(), false).is_err());
        let bytes = writer.bytes.borrow();
        assert!(bytes.ends_with(&leave_sequence()));
    }

    #[test]
    fn test_menu_navigation() {
        let mut app = test_app();
        assert_eq!(app.active_menu_item(), MenuItem::Dataset);

        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.active_menu_item(), MenuItem::Graphs);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_menu_item(), MenuItem::Calculator);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_menu_item(), MenuItem::Dataset);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.active_menu_item(), MenuItem::Calculator);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());

        let mut app = test_app();
        app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit());
    }

    #[test]
    fn test_out_of_domain_records_are_counted() {
        let app = test_app();
        assert_eq!(app.out_of_domain, 1);
        assert_eq!(app.categorized.len(), 4);
    }

    #[test]
    fn test_calculator_reaches_senior_obese_estimate() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('c'));

        // Young Adult -> Middle-aged -> Senior
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        // BMI: Underweight -> Obese
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Left);
        // smoker: no -> yes
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        // region: northeast -> southeast
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);

        assert_eq!(
            app.calculator.result,
            Estimate::Charge {
                mean: 35000.0,
                matches: 2
            }
        );
        let text = screen_text(&app);
        assert!(text.contains("Estimated Insurance Cost: $35000.00"));
        assert!(text.contains("Average over 2 matching records"));
    }

    #[test]
    fn test_calculator_shows_no_match() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('c'));

        let text = screen_text(&app);
        assert_eq!(app.calculator.result, Estimate::NoMatch);
        assert!(text.contains("No exact matches found."));
        assert!(text.contains("Try changing your inputs."));
    }

    #[test]
    fn test_dataset_view_renders_rows() {
        let mut app = test_app();
        press(&mut app, KeyCode::End);
        assert_eq!(app.dataset_view.selected, 3);

        let text = screen_text(&app);
        assert!(text.contains("Dataset View"));
        assert!(text.contains("4 rows"));
        assert!(text.contains("charges"));
        assert!(text.contains("30000.00"));
        assert!(text.contains("southeast"));
    }

    #[test]
    fn test_every_graph_renders() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('g'));

        let expected = [
            "Scatter Plot",
            "Box Plot",
            "Smoker & Sex",
            "BMI Distribution",
            "Correlation Matrix",
            "BMI Category",
        ];
        for title in expected {
            let text = screen_text(&app);
            assert!(text.contains(title), "missing {title}");
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.graphs.current, 0);
    }

    #[test]
    fn test_graphs_render_with_empty_dataset() {
        let mut app = App::new(Dataset::from_records(Vec::new(), "memory"), &Config::default());
        for _ in 0..6 {
            press(&mut app, KeyCode::Char('g'));
            screen_text(&app);
            press(&mut app, KeyCode::Right);
        }
        press(&mut app, KeyCode::Char('d'));
        assert!(screen_text(&app).contains("0 rows"));
    }
}
