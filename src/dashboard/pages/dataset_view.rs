//! Dataset View page: the raw rows in a scrollable table.

use tui::{
    backend::Backend,
    layout::{Constraint, Rect},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::dashboard::styles::Theme;
use crate::dataset::{Dataset, Record};

const PAGE: usize = 20;

#[derive(Debug, Default)]
pub struct DatasetViewState {
    pub selected: usize,
}

impl DatasetViewState {
    pub fn scroll_down(&mut self, by: usize, rows: usize) {
        if rows == 0 {
            return;
        }
        self.selected = (self.selected + by).min(rows - 1);
    }

    pub fn scroll_up(&mut self, by: usize) {
        self.selected = self.selected.saturating_sub(by);
    }

    pub fn page_down(&mut self, rows: usize) {
        self.scroll_down(PAGE, rows);
    }

    pub fn page_up(&mut self) {
        self.scroll_up(PAGE);
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self, rows: usize) {
        self.selected = rows.saturating_sub(1);
    }
}

fn record_row(index: usize, record: &Record) -> Row<'static> {
    Row::new(vec![
        Cell::from(Span::styled(index.to_string(), Theme::muted())),
        Cell::from(record.age.to_string()),
        Cell::from(record.sex.as_str()),
        Cell::from(format!("{:.3}", record.bmi)),
        Cell::from(record.children.to_string()),
        Cell::from(Span::styled(
            record.smoker.as_str(),
            tui::style::Style::default().fg(Theme::smoker(record.smoker)),
        )),
        Cell::from(record.region.as_str()),
        Cell::from(format!("{:.2}", record.charges)),
    ])
}

pub fn render_dataset_view<B: Backend>(
    f: &mut Frame<B>,
    area: Rect,
    dataset: &Dataset,
    state: &DatasetViewState,
) {
    let header = Row::new(
        std::iter::once("#")
            .chain(dataset.columns())
            .map(|c| Cell::from(c).style(Theme::header())),
    )
    .bottom_margin(1);

    let rows: Vec<Row> = dataset
        .records()
        .iter()
        .enumerate()
        .map(|(i, r)| record_row(i, r))
        .collect();

    let title = Spans::from(vec![
        Span::styled(" Dataset View ", Theme::title()),
        Span::styled(
            format!(
                "│ {} rows │ {} │ loaded {} ",
                dataset.len(),
                dataset.source(),
                dataset.loaded_at().format("%Y-%m-%d %H:%M:%S")
            ),
            Theme::muted(),
        ),
    ]);

    let widths = [
        Constraint::Length(5),
        Constraint::Length(4),
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(12),
    ];
    let table = Table::new(rows)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .widths(&widths)
        .column_spacing(2)
        .highlight_style(Theme::highlight())
        .highlight_symbol("> ");

    let mut table_state = TableState::default();
    if !dataset.is_empty() {
        table_state.select(Some(state.selected.min(dataset.len() - 1)));
    }
    f.render_stateful_widget(table, area, &mut table_state);
}
