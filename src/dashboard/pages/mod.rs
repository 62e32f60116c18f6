//! Page views and the shared menu bar.

pub mod calculator;
pub mod dataset_view;
pub mod graphs;

use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::dashboard::app::{App, MenuItem};
use crate::dashboard::styles::Theme;

const MENU_TITLES: [&str; 4] = ["Dataset", "Graphs", "Calculator", "Quit"];

pub fn render_app<B: Backend>(f: &mut Frame<B>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(f.size());

    render_menu(f, chunks[0], app.active_menu_item);
    match app.active_menu_item {
        MenuItem::Dataset => {
            dataset_view::render_dataset_view(f, chunks[1], &app.dataset, &app.dataset_view)
        }
        MenuItem::Graphs => graphs::render_graphs(f, chunks[1], &app.graphs),
        MenuItem::Calculator => {
            calculator::render_calculator(f, chunks[1], &app.calculator, app.out_of_domain)
        }
    }
    render_footer(f, chunks[2], app.active_menu_item);
}

fn render_menu<B: Backend>(f: &mut Frame<B>, area: Rect, active: MenuItem) {
    let menu = MENU_TITLES
        .iter()
        .map(|t| {
            let (first, rest) = t.split_at(1);
            Spans::from(vec![
                Span::styled(first, Theme::key_hint()),
                Span::styled(rest, Theme::key_desc()),
            ])
        })
        .collect();

    let tabs = Tabs::new(menu)
        .select(active.into())
        .block(
            Block::default()
                .title(Span::styled(" Insurance Data Analysis ", Theme::title()))
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .style(Theme::border())
        .highlight_style(Theme::focused())
        .divider(Span::raw("|"));

    f.render_widget(tabs, area);
}

fn render_footer<B: Backend>(f: &mut Frame<B>, area: Rect, active: MenuItem) {
    let hints: &[(&str, &str)] = match active {
        MenuItem::Dataset => &[("↑↓", "Scroll"), ("PgUp/PgDn", "Page"), ("Home/End", "Jump")],
        MenuItem::Graphs => &[("←→", "Previous/next chart")],
        MenuItem::Calculator => &[
            ("↑↓", "Field"),
            ("←→", "Change"),
            ("0-9", "Children"),
            ("S", "Sample profile"),
            ("R", "Reset"),
        ],
    };

    let mut spans = Vec::new();
    for (key, desc) in hints.iter().chain(&[("Tab", "Next page"), ("Q", "Quit")]) {
        spans.push(Span::styled(format!("[{key}] "), Theme::focused()));
        spans.push(Span::styled(format!("{desc}  "), Theme::key_desc()));
    }

    let footer = Paragraph::new(Spans::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Theme::muted()),
    );
    f.render_widget(footer, area);
}
