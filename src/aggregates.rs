//! Figures behind the six charts of the Graphs page.
//!
//! Every mean here goes through the same in-order summation as the
//! estimator.

use std::collections::BTreeMap;

use crate::dataset::{Record, Region, Sex, Smoker};
use crate::estimator::ordered_mean;

/// Histogram edges for BMI: 15, 20, ..., 50.
pub const BMI_BIN_EDGES: [f64; 8] = [15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0];

/// Vertical markers drawn over the BMI histogram.
pub const BMI_REFERENCE_LINES: [(f64, &str); 2] =
    [(25.0, "Overweight (BMI 25)"), (30.0, "Obese (BMI 30)")];

/// Hardcoded averages for the BMI category bar chart. Not derived from the
/// loaded data.
pub const STATIC_BMI_CHARGES: [(&str, u64); 4] = [
    ("Underweight", 8658),
    ("Normal", 10405),
    ("Overweight", 11007),
    ("Obese", 15492),
];

/// Numeric columns of the correlation matrix, in display order.
pub const NUMERIC_COLUMNS: [&str; 4] = ["age", "bmi", "children", "charges"];

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub smoker: Smoker,
    /// (age, charges)
    pub points: Vec<(f64, f64)>,
}

/// Charges against age, one series per smoker status in order of first
/// appearance.
pub fn scatter_by_smoker(records: &[Record]) -> Vec<ScatterSeries> {
    let mut series: Vec<ScatterSeries> = Vec::new();
    for record in records {
        let point = (f64::from(record.age), record.charges);
        match series.iter_mut().find(|s| s.smoker == record.smoker) {
            Some(s) => s.points.push(point),
            None => series.push(ScatterSeries {
                smoker: record.smoker,
                points: vec![point],
            }),
        }
    }
    series
}

/// Charges grouped by region, regions in order of first appearance.
pub fn charges_by_region(records: &[Record]) -> Vec<(Region, Vec<f64>)> {
    let mut groups: Vec<(Region, Vec<f64>)> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|(region, _)| *region == record.region) {
            Some((_, charges)) => charges.push(record.charges),
            None => groups.push((record.region, vec![record.charges])),
        }
    }
    groups
}

/// Five-number summary plus mean for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub region: Region,
    pub count: usize,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub mean: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// `None` for an empty group.
    pub fn from_values(region: Region, values: &[f64]) -> Option<Self> {
        let (mean, count) = ordered_mean(values.iter().copied())?;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let lower_whisker = sorted.iter().copied().find(|v| *v >= low_fence).unwrap_or(q1);
        let upper_whisker = sorted.iter().rev().copied().find(|v| *v <= high_fence).unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(Self {
            region,
            count,
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            mean,
            outliers,
        })
    }
}

/// Linear interpolation between closest ranks. `sorted` must be non-empty.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Box plot summaries of charges per region.
pub fn region_box_stats(records: &[Record]) -> Vec<BoxStats> {
    charges_by_region(records)
        .into_iter()
        .filter_map(|(region, charges)| BoxStats::from_values(region, &charges))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupMean {
    pub smoker: Smoker,
    pub sex: Sex,
    pub mean: f64,
    pub count: usize,
}

/// Mean charges per (smoker, sex), sorted by smoker then sex.
pub fn mean_charges_by_smoker_sex(records: &[Record]) -> Vec<GroupMean> {
    let mut groups: BTreeMap<(Smoker, Sex), Vec<f64>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.smoker, record.sex))
            .or_default()
            .push(record.charges);
    }

    groups
        .into_iter()
        .filter_map(|((smoker, sex), charges)| {
            let (mean, count) = ordered_mean(charges)?;
            Some(GroupMean {
                smoker,
                sex,
                mean,
                count,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin counts for `values`: half-open `[lo, hi)` bins, the last one
    /// closed. Values outside the edges are dropped.
    pub fn from_values(values: impl IntoIterator<Item = f64>, edges: &[f64]) -> Self {
        if edges.len() < 2 {
            return Self {
                edges: edges.to_vec(),
                counts: Vec::new(),
            };
        }
        let last = edges.len() - 2;
        let mut counts = vec![0usize; edges.len() - 1];
        for x in values {
            for i in 0..=last {
                let in_bin = (x >= edges[i] && x < edges[i + 1]) || (i == last && x == edges[i + 1]);
                if in_bin {
                    counts[i] += 1;
                    break;
                }
            }
        }
        Self {
            edges: edges.to_vec(),
            counts,
        }
    }

    /// Labels such as `15-20`, one per bin.
    pub fn labels(&self) -> Vec<String> {
        self.edges
            .windows(2)
            .map(|w| format!("{}-{}", w[0], w[1]))
            .collect()
    }
}

pub fn bmi_histogram(records: &[Record]) -> Histogram {
    Histogram::from_values(records.iter().map(|r| r.bmi), &BMI_BIN_EDGES)
}

/// Pearson correlations among [`NUMERIC_COLUMNS`].
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: [&'static str; 4],
    pub values: [[f64; 4]; 4],
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }
}

/// Pairwise Pearson correlation. A constant column correlates as NaN with
/// everything, itself included.
pub fn correlation_matrix(records: &[Record]) -> CorrelationMatrix {
    let columns: [Vec<f64>; 4] = [
        records.iter().map(|r| f64::from(r.age)).collect(),
        records.iter().map(|r| r.bmi).collect(),
        records.iter().map(|r| f64::from(r.children)).collect(),
        records.iter().map(|r| r.charges).collect(),
    ];

    let mut values = [[f64::NAN; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            values[i][j] = if i == j {
                if variance_is_positive(&columns[i]) {
                    1.0
                } else {
                    f64::NAN
                }
            } else {
                pearson(&columns[i], &columns[j])
            };
        }
    }

    CorrelationMatrix {
        labels: NUMERIC_COLUMNS,
        values,
    }
}

fn variance_is_positive(xs: &[f64]) -> bool {
    match ordered_mean(xs.iter().copied()) {
        Some((m, n)) if n > 1 => xs.iter().any(|x| (x - m).abs() > 0.0),
        _ => false,
    }
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let (Some((mx, n)), Some((my, _))) = (
        ordered_mean(xs.iter().copied()),
        ordered_mean(ys.iter().copied()),
    ) else {
        return f64::NAN;
    };
    if n < 2 {
        return f64::NAN;
    }

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(age: u32, sex: Sex, bmi: f64, smoker: Smoker, region: Region, charges: f64) -> Record {
        Record {
            age,
            sex,
            bmi,
            children: 0,
            smoker,
            region,
            charges,
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record(19, Sex::Female, 27.9, Smoker::Yes, Region::Southwest, 16884.924),
            record(18, Sex::Male, 33.77, Smoker::No, Region::Southeast, 1725.5523),
            record(28, Sex::Male, 33.0, Smoker::No, Region::Southeast, 4449.462),
            record(33, Sex::Male, 22.705, Smoker::No, Region::Northwest, 21984.47061),
            record(32, Sex::Male, 28.88, Smoker::No, Region::Northwest, 3866.8552),
            record(31, Sex::Female, 25.74, Smoker::No, Region::Southeast, 3756.6216),
            record(62, Sex::Female, 26.29, Smoker::Yes, Region::Southeast, 27808.7251),
        ]
    }

    #[test]
    fn test_scatter_series_follow_first_appearance() {
        let series = scatter_by_smoker(&sample());

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].smoker, Smoker::Yes);
        assert_eq!(series[0].points, vec![(19.0, 16884.924), (62.0, 27808.7251)]);
        assert_eq!(series[1].smoker, Smoker::No);
        assert_eq!(series[1].points.len(), 5);
    }

    #[test]
    fn test_charges_by_region_order() {
        let groups = charges_by_region(&sample());
        let regions: Vec<Region> = groups.iter().map(|(r, _)| *r).collect();

        assert_eq!(
            regions,
            vec![Region::Southwest, Region::Southeast, Region::Northwest]
        );
        assert_eq!(groups[1].1, vec![1725.5523, 4449.462, 3756.6216, 27808.7251]);
    }

    #[test]
    fn test_box_stats_quartiles() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = BoxStats::from_values(Region::Northeast, &values).expect("Should summarize");

        assert_eq!(stats.count, 5);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 5.0);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn test_box_stats_outliers_and_interpolation() {
        let values = [10.0, 12.0, 11.0, 13.0, 100.0, 12.5];
        let stats = BoxStats::from_values(Region::Southwest, &values).expect("Should summarize");

        // sorted: 10, 11, 12, 12.5, 13, 100
        assert!((stats.q1 - 11.25).abs() < 1e-12);
        assert!((stats.median - 12.25).abs() < 1e-12);
        assert!((stats.q3 - 12.875).abs() < 1e-12);
        assert_eq!(stats.upper_whisker, 13.0);
        assert_eq!(stats.outliers, vec![100.0]);
    }

    #[test]
    fn test_box_stats_empty_group() {
        assert!(BoxStats::from_values(Region::Northeast, &[]).is_none());
    }

    #[test]
    fn test_region_box_stats_means_match_group_means() {
        let stats = region_box_stats(&sample());
        assert_eq!(stats.len(), 3);
        let southeast = &stats[1];
        let expected: f64 = (1725.5523 + 4449.462 + 3756.6216 + 27808.7251) / 4.0;
        assert_eq!(southeast.mean.to_bits(), expected.to_bits());
    }

    #[test]
    fn test_group_means_sorted_by_smoker_then_sex() {
        let groups = mean_charges_by_smoker_sex(&sample());
        let keys: Vec<(Smoker, Sex)> = groups.iter().map(|g| (g.smoker, g.sex)).collect();

        assert_eq!(
            keys,
            vec![
                (Smoker::No, Sex::Female),
                (Smoker::No, Sex::Male),
                (Smoker::Yes, Sex::Female),
            ]
        );
        assert_eq!(groups[0].mean, 3756.6216);
        assert_eq!(groups[1].count, 4);
        let yes_female = (16884.924 + 27808.7251) / 2.0;
        assert_eq!(groups[2].mean, yes_female);
    }

    #[test]
    fn test_bmi_histogram_bins() {
        let hist = bmi_histogram(&sample());

        assert_eq!(hist.counts.len(), 7);
        // 22.705 | 27.9, 28.88, 25.74, 26.29 | 33.77, 33.0
        assert_eq!(hist.counts, vec![0, 1, 4, 2, 0, 0, 0]);
        assert_eq!(hist.labels()[0], "15-20");
    }

    #[test]
    fn test_histogram_edges_are_half_open_except_last() {
        let hist = Histogram::from_values(vec![15.0, 20.0, 50.0, 14.9, 50.1], &BMI_BIN_EDGES);
        assert_eq!(hist.counts, vec![1, 1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_correlation_of_linear_columns() {
        let records: Vec<Record> = (0..10)
            .map(|i| {
                let mut r = record(20 + i, Sex::Male, 20.0 + f64::from(i), Smoker::No, Region::Northeast, 0.0);
                r.charges = 1000.0 - 10.0 * f64::from(i);
                r.children = i % 2;
                r
            })
            .collect();
        let matrix = correlation_matrix(&records);

        assert_eq!(matrix.labels, NUMERIC_COLUMNS);
        assert!((matrix.get(0, 1) - 1.0).abs() < 1e-12);
        assert!((matrix.get(0, 3) + 1.0).abs() < 1e-12);
        assert_eq!(matrix.get(2, 2), 1.0);
        assert_eq!(matrix.get(1, 0), matrix.get(0, 1));
    }

    #[test]
    fn test_constant_column_correlates_as_nan() {
        // children is always 0
        let matrix = correlation_matrix(&sample());
        assert!(matrix.get(2, 2).is_nan());
        assert!(matrix.get(2, 3).is_nan());
        assert_eq!(matrix.get(0, 0), 1.0);
    }

    #[test]
    fn test_empty_dataset_aggregates() {
        assert!(scatter_by_smoker(&[]).is_empty());
        assert!(region_box_stats(&[]).is_empty());
        assert!(mean_charges_by_smoker_sex(&[]).is_empty());
        assert_eq!(bmi_histogram(&[]).counts, vec![0; 7]);
        assert!(correlation_matrix(&[]).get(0, 1).is_nan());
    }
}
