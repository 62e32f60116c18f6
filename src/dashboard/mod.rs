//! Terminal dashboard built on `tui` + `crossterm`.
//!
//! Three pages share one immutable [`Dataset`](crate::Dataset):
//! - Dataset View: the raw rows
//! - Graphs: six descriptive charts
//! - Charge Calculator: bucket selectors and the live estimate

mod app;
mod pages;
mod styles;

pub use app::{App, MenuItem};
pub use pages::calculator::{CalculatorState, Field};
pub use pages::graphs::{GraphData, GraphKind};
pub use styles::Theme;
