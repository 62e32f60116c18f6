//! Charge estimation: mean `charges` over records matching a query exactly.
//!
//! A full linear scan over the categorized rows. The dataset is a few
//! hundred rows, so there is no index and no cache.

use serde::{Deserialize, Serialize};

use crate::categorizer::{AgeCategory, BmiCategory, CategorizedRecord};
use crate::dataset::{Region, Sex, Smoker};

/// A fully specified lookup: every field must match exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    pub age_category: AgeCategory,
    pub bmi_category: BmiCategory,
    pub sex: Sex,
    pub children: u32,
    pub smoker: Smoker,
    pub region: Region,
}

impl Query {
    /// The query that `record` answers, if both of its buckets are defined.
    pub fn from_record(record: &CategorizedRecord) -> Option<Self> {
        Some(Self {
            age_category: record.age_category?,
            bmi_category: record.bmi_category?,
            sex: record.record.sex,
            children: record.record.children,
            smoker: record.record.smoker,
            region: record.record.region,
        })
    }

    pub fn matches(&self, candidate: &CategorizedRecord) -> bool {
        candidate.age_category == Some(self.age_category)
            && candidate.bmi_category == Some(self.bmi_category)
            && candidate.record.sex == self.sex
            && candidate.record.children == self.children
            && candidate.record.smoker == self.smoker
            && candidate.record.region == self.region
    }
}

/// Outcome of an estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Estimate {
    /// Mean charge over `matches` records (never zero).
    Charge { mean: f64, matches: usize },
    /// No record matched; not an error, the user should try other inputs.
    NoMatch,
}

impl Estimate {
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        match self {
            Estimate::Charge { mean, .. } => Some(*mean),
            Estimate::NoMatch => None,
        }
    }

    #[must_use]
    pub fn matches(&self) -> usize {
        match self {
            Estimate::Charge { matches, .. } => *matches,
            Estimate::NoMatch => 0,
        }
    }
}

/// Mean charge of every record matching `query`.
pub fn estimate(dataset: &[CategorizedRecord], query: &Query) -> Estimate {
    let charges = dataset
        .iter()
        .filter(|candidate| query.matches(candidate))
        .map(|candidate| candidate.record.charges);

    let result = match ordered_mean(charges) {
        Some((mean, matches)) => Estimate::Charge { mean, matches },
        None => Estimate::NoMatch,
    };
    tracing::debug!(?query, ?result, "estimated charges");
    result
}

/// Sum in iteration order, then divide; `None` for an empty input.
///
/// Shared by every mean in the crate so that chart aggregates and estimates
/// agree bit for bit.
pub(crate) fn ordered_mean<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, usize)> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some((sum / count as f64, count))
    }
}
