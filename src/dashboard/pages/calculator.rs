//! Charge Calculator page: six selectors and the live estimate.

use rand::seq::SliceRandom;
use rand::Rng;
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::categorizer::{AgeCategory, BmiCategory, CategorizedRecord};
use crate::dashboard::styles::Theme;
use crate::dataset::{Region, Sex, Smoker};
use crate::estimator::{estimate, Estimate, Query};

pub const MAX_CHILDREN: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    AgeCategory,
    BmiCategory,
    Sex,
    Children,
    Smoker,
    Region,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::AgeCategory,
        Field::BmiCategory,
        Field::Sex,
        Field::Children,
        Field::Smoker,
        Field::Region,
    ];

    pub fn prompt(self) -> &'static str {
        match self {
            Field::AgeCategory => "Select Age Category",
            Field::BmiCategory => "Select BMI Category",
            Field::Sex => "Select Gender",
            Field::Children => "Number of Children",
            Field::Smoker => "Are you a Smoker?",
            Field::Region => "Select Region",
        }
    }
}

/// Step through `choices` from `current`, wrapping at both ends.
fn cycle<T: Copy + PartialEq>(choices: &[T], current: T, forward: bool) -> T {
    let len = choices.len();
    let pos = choices.iter().position(|c| *c == current).unwrap_or(0);
    let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
    choices[next]
}

pub struct CalculatorState {
    pub query: Query,
    pub selected_field: usize,
    pub result: Estimate,
    pub message: Option<String>,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            query: Query {
                age_category: AgeCategory::YoungAdult,
                bmi_category: BmiCategory::Underweight,
                sex: Sex::Male,
                children: 0,
                smoker: Smoker::No,
                region: Region::Northeast,
            },
            selected_field: 0,
            result: Estimate::NoMatch,
            message: None,
        }
    }
}

impl CalculatorState {
    pub fn new(data: &[CategorizedRecord]) -> Self {
        let mut state = Self::default();
        state.refresh(data);
        state
    }

    pub fn field(&self) -> Field {
        Field::ALL[self.selected_field]
    }

    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % Field::ALL.len();
    }

    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = Field::ALL.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Move the selected field to its next (or previous) choice.
    pub fn step_value(&mut self, forward: bool, data: &[CategorizedRecord]) {
        let field = self.field();
        let q = &mut self.query;
        match field {
            Field::AgeCategory => q.age_category = cycle(&AgeCategory::ALL, q.age_category, forward),
            Field::BmiCategory => q.bmi_category = cycle(&BmiCategory::ALL, q.bmi_category, forward),
            Field::Sex => q.sex = cycle(&Sex::ALL, q.sex, forward),
            Field::Smoker => q.smoker = cycle(&Smoker::ALL, q.smoker, forward),
            Field::Region => q.region = cycle(&Region::ALL, q.region, forward),
            Field::Children => {
                q.children = if forward {
                    (q.children + 1).min(MAX_CHILDREN)
                } else {
                    q.children.saturating_sub(1)
                }
            }
        }
        self.message = None;
        self.refresh(data);
    }

    /// Digits set the children count directly when that field is selected.
    pub fn input_digit(&mut self, digit: char, data: &[CategorizedRecord]) {
        if self.field() != Field::Children {
            return;
        }
        if let Some(n) = digit.to_digit(10) {
            self.query.children = n;
            self.message = None;
            self.refresh(data);
        }
    }

    /// Fill the form from a random categorized record.
    pub fn load_sample<R: Rng + ?Sized>(&mut self, data: &[CategorizedRecord], rng: &mut R) {
        let candidates: Vec<Query> = data.iter().filter_map(Query::from_record).collect();
        match candidates.choose(rng) {
            Some(query) => {
                self.query = *query;
                self.message = Some("Loaded a profile from the dataset".to_string());
                self.refresh(data);
            }
            None => {
                self.message = Some("No categorized records to sample from".to_string());
            }
        }
    }

    pub fn reset(&mut self, data: &[CategorizedRecord]) {
        *self = Self::new(data);
    }

    pub fn refresh(&mut self, data: &[CategorizedRecord]) {
        self.result = estimate(data, &self.query);
    }

    fn value_label(&self, field: Field) -> String {
        let q = &self.query;
        match field {
            Field::AgeCategory => q.age_category.label().to_string(),
            Field::BmiCategory => q.bmi_category.label().to_string(),
            Field::Sex => q.sex.to_string(),
            Field::Children => q.children.to_string(),
            Field::Smoker => q.smoker.to_string(),
            Field::Region => q.region.to_string(),
        }
    }
}

pub fn render_calculator<B: Backend>(
    f: &mut Frame<B>,
    area: Rect,
    state: &CalculatorState,
    out_of_domain: usize,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(area);

    render_fields(f, chunks[0], state);
    render_result(f, chunks[1], state, out_of_domain);
}

fn render_fields<B: Backend>(f: &mut Frame<B>, area: Rect, state: &CalculatorState) {
    let block = Block::default()
        .title(Span::styled(" Enter your details here ", Theme::title()))
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let constraints: Vec<Constraint> = Field::ALL
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in Field::ALL.iter().enumerate() {
        let selected = i == state.selected_field;
        let (border, title) = if selected {
            (Theme::focused(), Theme::focused())
        } else {
            (Theme::muted(), Theme::text())
        };

        let value = Spans::from(vec![
            Span::styled(if selected { " ◀ " } else { "   " }, Theme::focused()),
            Span::styled(state.value_label(*field), Theme::text()),
            Span::styled(if selected { " ▶" } else { "" }, Theme::focused()),
        ]);
        let widget = Paragraph::new(value).block(
            Block::default()
                .title(Span::styled(format!(" {} ", field.prompt()), title))
                .borders(Borders::ALL)
                .border_style(border),
        );
        f.render_widget(widget, rows[i]);
    }
}

fn render_result<B: Backend>(
    f: &mut Frame<B>,
    area: Rect,
    state: &CalculatorState,
    out_of_domain: usize,
) {
    let mut lines = vec![Spans::from(""), Spans::from("")];
    match state.result {
        Estimate::Charge { mean, matches } => {
            lines.push(Spans::from(vec![
                Span::styled("Estimated Insurance Cost: ", Theme::title()),
                Span::styled(format!("${mean:.2}"), Theme::success()),
            ]));
            lines.push(Spans::from(""));
            let noun = if matches == 1 { "record" } else { "records" };
            lines.push(Spans::from(Span::styled(
                format!("Average over {matches} matching {noun}"),
                Theme::muted(),
            )));
        }
        Estimate::NoMatch => {
            lines.push(Spans::from(Span::styled("No exact matches found.", Theme::danger())));
            lines.push(Spans::from(Span::styled("Try changing your inputs.", Theme::text())));
        }
    }

    if out_of_domain > 0 {
        lines.push(Spans::from(""));
        lines.push(Spans::from(Span::styled(
            format!("{out_of_domain} records fall outside every age/BMI bucket and are never matched"),
            Theme::muted(),
        )));
    }
    if let Some(message) = &state.message {
        lines.push(Spans::from(""));
        lines.push(Spans::from(Span::styled(message.clone(), Theme::focused())));
    }

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(" Insurance Charge Calculator ", Theme::title()))
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );
    f.render_widget(widget, area);
}
