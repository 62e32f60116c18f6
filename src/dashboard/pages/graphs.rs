//! Graphs page: the six descriptive charts, one at a time.

use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::{Span, Spans},
    widgets::{
        Axis, BarChart, Block, Borders, Cell, Chart, Dataset as ChartSeries, GraphType, Paragraph,
        Row, Table,
    },
    Frame,
};

use crate::aggregates::{
    bmi_histogram, correlation_matrix, mean_charges_by_smoker_sex, region_box_stats,
    scatter_by_smoker, BoxStats, CorrelationMatrix, GroupMean, Histogram, ScatterSeries,
    BMI_REFERENCE_LINES, STATIC_BMI_CHARGES,
};
use crate::dashboard::styles::Theme;
use crate::dataset::{Dataset, Sex, Smoker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    ChargesVsAge,
    ChargesByRegion,
    SmokerSexMeans,
    BmiHistogram,
    Correlation,
    BmiCategoryCharges,
}

impl GraphKind {
    pub const ALL: [GraphKind; 6] = [
        GraphKind::ChargesVsAge,
        GraphKind::ChargesByRegion,
        GraphKind::SmokerSexMeans,
        GraphKind::BmiHistogram,
        GraphKind::Correlation,
        GraphKind::BmiCategoryCharges,
    ];

    pub fn title(self) -> &'static str {
        match self {
            GraphKind::ChargesVsAge => "Scatter Plot: Charges vs Age (by Smoker Status)",
            GraphKind::ChargesByRegion => "Box Plot: Insurance Charges by Region",
            GraphKind::SmokerSexMeans => "Bar Chart: Average Charges by Smoker & Sex",
            GraphKind::BmiHistogram => "Histogram: BMI Distribution",
            GraphKind::Correlation => "Correlation Matrix of Numerical Variables",
            GraphKind::BmiCategoryCharges => "Average Medical Charges by BMI Category",
        }
    }
}

/// Chart inputs, computed once per dataset.
#[derive(Debug, Clone)]
pub struct GraphData {
    pub scatter: Vec<ScatterSeries>,
    pub boxes: Vec<BoxStats>,
    pub group_means: Vec<GroupMean>,
    pub histogram: Histogram,
    pub correlation: CorrelationMatrix,
}

impl GraphData {
    pub fn new(dataset: &Dataset) -> Self {
        let records = dataset.records();
        Self {
            scatter: scatter_by_smoker(records),
            boxes: region_box_stats(records),
            group_means: mean_charges_by_smoker_sex(records),
            histogram: bmi_histogram(records),
            correlation: correlation_matrix(records),
        }
    }
}

pub struct GraphsState {
    pub current: usize,
    pub data: GraphData,
}

impl GraphsState {
    pub fn new(dataset: &Dataset) -> Self {
        Self {
            current: 0,
            data: GraphData::new(dataset),
        }
    }

    pub fn kind(&self) -> GraphKind {
        GraphKind::ALL[self.current]
    }

    pub fn next(&mut self) {
        self.current = (self.current + 1) % GraphKind::ALL.len();
    }

    pub fn previous(&mut self) {
        self.current = (self.current + GraphKind::ALL.len() - 1) % GraphKind::ALL.len();
    }
}

pub fn render_graphs<B: Backend>(f: &mut Frame<B>, area: Rect, state: &GraphsState) {
    let kind = state.kind();
    let block = Block::default()
        .title(Spans::from(vec![
            Span::styled(format!(" {}/{} ", state.current + 1, GraphKind::ALL.len()), Theme::muted()),
            Span::styled(format!("{} ", kind.title()), Theme::title()),
        ]))
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let data = &state.data;
    match kind {
        GraphKind::ChargesVsAge => render_scatter(f, inner, &data.scatter),
        GraphKind::ChargesByRegion => render_box_plot(f, inner, &data.boxes),
        GraphKind::SmokerSexMeans => render_group_means(f, inner, &data.group_means),
        GraphKind::BmiHistogram => render_histogram(f, inner, &data.histogram),
        GraphKind::Correlation => render_heatmap(f, inner, &data.correlation),
        GraphKind::BmiCategoryCharges => render_static_bmi(f, inner),
    }
}

fn render_empty<B: Backend>(f: &mut Frame<B>, area: Rect) {
    f.render_widget(
        Paragraph::new(Span::styled("No records to plot", Theme::muted())),
        area,
    );
}

fn render_scatter<B: Backend>(f: &mut Frame<B>, area: Rect, series: &[ScatterSeries]) {
    let points = series.iter().flat_map(|s| s.points.iter());
    let (mut min_x, mut max_x, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY, 0.0_f64);
    for (x, y) in points {
        min_x = min_x.min(*x);
        max_x = max_x.max(*x);
        max_y = max_y.max(*y);
    }
    if !min_x.is_finite() {
        render_empty(f, area);
        return;
    }
    let x_bounds = [min_x - 1.0, max_x + 1.0];
    let y_bounds = [0.0, (max_y * 1.05).max(1.0)];

    let datasets = series
        .iter()
        .map(|s| {
            let name = match s.smoker {
                Smoker::Yes => "Smoker: yes",
                Smoker::No => "Smoker: no",
            };
            ChartSeries::default()
                .name(name)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Theme::smoker(s.smoker)))
                .data(&s.points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title(Span::styled("Age", Theme::title()))
                .style(Theme::muted())
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds, 0)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Charges", Theme::title()))
                .style(Theme::muted())
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds, 0)),
        );
    f.render_widget(chart, area);
}

fn axis_labels(bounds: [f64; 2], precision: usize) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .iter()
        .map(|v| Span::styled(format!("{v:.precision$}"), Theme::muted()))
        .collect()
}

/// One text row per region: whiskers, box, median and mean scaled to `width`.
fn box_line(stats: &BoxStats, lo: f64, hi: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let span = (hi - lo).max(f64::EPSILON);
    let pos = |v: f64| (((v - lo) / span) * (width - 1) as f64).round().clamp(0.0, (width - 1) as f64) as usize;

    let mut cells = vec![' '; width];
    let (lw, q1, med, q3, uw) = (
        pos(stats.lower_whisker),
        pos(stats.q1),
        pos(stats.median),
        pos(stats.q3),
        pos(stats.upper_whisker),
    );
    for c in cells.iter_mut().take(q1).skip(lw) {
        *c = '─';
    }
    for c in cells.iter_mut().take(uw + 1).skip(q3) {
        *c = '─';
    }
    for c in cells.iter_mut().take(q3 + 1).skip(q1) {
        *c = '█';
    }
    cells[lw] = '├';
    cells[uw] = '┤';
    cells[med] = '┃';
    for outlier in &stats.outliers {
        cells[pos(*outlier)] = '•';
    }
    cells[pos(stats.mean)] = '◆';
    cells.into_iter().collect()
}

fn render_box_plot<B: Backend>(f: &mut Frame<B>, area: Rect, boxes: &[BoxStats]) {
    if boxes.is_empty() {
        render_empty(f, area);
        return;
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(boxes.len() as u16 + 3)].as_ref())
        .split(area);

    let lo = boxes
        .iter()
        .flat_map(|b| b.outliers.iter().copied().chain([b.lower_whisker]))
        .fold(f64::INFINITY, f64::min);
    let hi = boxes
        .iter()
        .flat_map(|b| b.outliers.iter().copied().chain([b.upper_whisker]))
        .fold(f64::NEG_INFINITY, f64::max);

    const LABEL: usize = 11;
    let width = (chunks[0].width as usize).saturating_sub(LABEL + 1);
    let mut lines = Vec::new();
    for stats in boxes {
        lines.push(Spans::from(vec![
            Span::styled(format!("{:<pad$}", stats.region.as_str(), pad = LABEL), Theme::text()),
            Span::styled(
                box_line(stats, lo, hi, width),
                Style::default().fg(Theme::region(stats.region)),
            ),
        ]));
        lines.push(Spans::from(""));
    }
    lines.push(Spans::from(vec![
        Span::styled(format!("{:<pad$}", "", pad = LABEL), Theme::muted()),
        Span::styled(
            format!("{lo:.0} … {hi:.0}   ┃ median  ◆ mean  • outlier"),
            Theme::muted(),
        ),
    ]));
    f.render_widget(Paragraph::new(lines), chunks[0]);

    let header = Row::new(["Region", "Count", "Q1", "Median", "Q3", "Mean", "Outliers"])
        .style(Theme::header());
    let rows = boxes.iter().map(|b| {
        Row::new(vec![
            b.region.as_str().to_string(),
            b.count.to_string(),
            format!("{:.2}", b.q1),
            format!("{:.2}", b.median),
            format!("{:.2}", b.q3),
            format!("{:.2}", b.mean),
            b.outliers.len().to_string(),
        ])
    });
    let widths = [
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(8),
    ];
    let table = Table::new(rows)
        .header(header)
        .block(Block::default().borders(Borders::TOP).border_style(Theme::muted()))
        .widths(&widths);
    f.render_widget(table, chunks[1]);
}

fn render_group_means<B: Backend>(f: &mut Frame<B>, area: Rect, groups: &[GroupMean]) {
    if groups.is_empty() {
        render_empty(f, area);
        return;
    }
    // Shared scale so bar heights compare across the two panels.
    let max = groups.iter().map(|g| g.mean.round() as u64).max().unwrap_or(0).max(1);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(area);
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[0]);

    for (sex, panel) in [Sex::Female, Sex::Male].into_iter().zip(panels.iter()) {
        let data: Vec<(&str, u64)> = groups
            .iter()
            .filter(|g| g.sex == sex)
            .map(|g| {
                let label = match g.smoker {
                    Smoker::No => "Non-Smoker",
                    Smoker::Yes => "Smoker",
                };
                (label, g.mean.round() as u64)
            })
            .collect();
        let color = Theme::sex(sex);
        let chart = BarChart::default()
            .block(
                Block::default()
                    .title(Span::styled(format!(" {sex} "), Style::default().fg(color)))
                    .borders(Borders::BOTTOM)
                    .border_style(Theme::muted()),
            )
            .data(&data)
            .max(max)
            .bar_width(13)
            .bar_gap(3)
            .bar_style(Style::default().fg(color))
            .value_style(Theme::highlight())
            .label_style(Theme::text());
        f.render_widget(chart, *panel);
    }

    let legend = Spans::from(vec![
        Span::styled("Average Charges by Smoker Status & Sex ", Theme::muted()),
        Span::styled("female", Style::default().fg(Theme::sex(Sex::Female))),
        Span::styled(" / ", Theme::muted()),
        Span::styled("male", Style::default().fg(Theme::sex(Sex::Male))),
    ]);
    f.render_widget(Paragraph::new(legend), chunks[1]);
}

fn render_histogram<B: Backend>(f: &mut Frame<B>, area: Rect, histogram: &Histogram) {
    if histogram.counts.iter().all(|c| *c == 0) {
        render_empty(f, area);
        return;
    }
    let labels = histogram.labels();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(&histogram.counts)
        .map(|(label, count)| (label.as_str(), *count as u64))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(area);

    let chart = BarChart::default()
        .data(&data)
        .bar_width(7)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Rgb(70, 130, 180)))
        .value_style(Theme::highlight())
        .label_style(Theme::text());
    f.render_widget(chart, chunks[0]);

    let mut markers = vec![Span::styled("BMI  ", Theme::title())];
    for (value, label) in BMI_REFERENCE_LINES {
        let color = if value < 30.0 { Color::Rgb(255, 140, 0) } else { Theme::BAD };
        markers.push(Span::styled(format!("┆ {label}  "), Style::default().fg(color)));
    }
    f.render_widget(Paragraph::new(Spans::from(markers)), chunks[1]);
}

fn render_heatmap<B: Backend>(f: &mut Frame<B>, area: Rect, matrix: &CorrelationMatrix) {
    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(matrix.labels.iter().map(|l| Cell::from(*l).style(Theme::header()))),
    )
    .height(1)
    .bottom_margin(1);

    let rows = matrix.labels.iter().enumerate().map(|(i, label)| {
        let cells = std::iter::once(Cell::from(*label).style(Theme::header())).chain(
            (0..matrix.labels.len()).map(move |j| {
                let value = matrix.get(i, j);
                let text = if value.is_nan() {
                    "nan".to_string()
                } else {
                    format!("{value:.2}")
                };
                Cell::from(format!("  {text}"))
                    .style(Style::default().fg(Color::Black).bg(Theme::heat(value)))
            }),
        );
        Row::new(cells).height(2)
    });

    let widths = [Constraint::Length(10); 5];
    let table = Table::new(rows)
        .header(header)
        .widths(&widths)
        .column_spacing(1);
    f.render_widget(table, area);
}

fn render_static_bmi<B: Backend>(f: &mut Frame<B>, area: Rect) {
    let chart = BarChart::default()
        .data(&STATIC_BMI_CHARGES)
        .bar_width(13)
        .bar_gap(4)
        .bar_style(Style::default().fg(Color::Rgb(46, 139, 87)))
        .value_style(Theme::highlight())
        .label_style(Theme::text());
    f.render_widget(chart, area);
}
