//! Age and BMI buckets.
//!
//! Buckets are closed on the right: a value sitting exactly on a cut point
//! belongs to the lower bucket. The lowest bucket is open on the left, so
//! `age <= 18` and `bmi <= 0` fall outside every bucket. Such records are
//! kept but left uncategorized (`None`), and no query ever matches them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeCategory {
    YoungAdult,
    MiddleAged,
    Senior,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Fit,
    Overweight,
    Obese,
}

impl AgeCategory {
    pub const ALL: [AgeCategory; 3] = [
        AgeCategory::YoungAdult,
        AgeCategory::MiddleAged,
        AgeCategory::Senior,
    ];

    /// (18, 35] / (35, 50] / (50, ∞)
    pub fn from_age(age: u32) -> Option<Self> {
        match age {
            19..=35 => Some(AgeCategory::YoungAdult),
            36..=50 => Some(AgeCategory::MiddleAged),
            51.. => Some(AgeCategory::Senior),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeCategory::YoungAdult => "Young Adult",
            AgeCategory::MiddleAged => "Middle-aged",
            AgeCategory::Senior => "Senior",
        }
    }
}

impl BmiCategory {
    pub const ALL: [BmiCategory; 4] = [
        BmiCategory::Underweight,
        BmiCategory::Fit,
        BmiCategory::Overweight,
        BmiCategory::Obese,
    ];

    /// (0, 18.5] / (18.5, 24.9] / (24.9, 29.9] / (29.9, ∞)
    pub fn from_bmi(bmi: f64) -> Option<Self> {
        // NaN fails this comparison too
        if !(bmi > 0.0) {
            return None;
        }
        let category = if bmi <= 18.5 {
            BmiCategory::Underweight
        } else if bmi <= 24.9 {
            BmiCategory::Fit
        } else if bmi <= 29.9 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        };
        Some(category)
    }

    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Fit => "Fit",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A record plus its derived buckets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategorizedRecord {
    pub record: Record,
    pub age_category: Option<AgeCategory>,
    pub bmi_category: Option<BmiCategory>,
}

impl CategorizedRecord {
    pub fn new(record: Record) -> Self {
        Self {
            record,
            age_category: AgeCategory::from_age(record.age),
            bmi_category: BmiCategory::from_bmi(record.bmi),
        }
    }

    /// Both buckets are defined.
    pub fn is_categorized(&self) -> bool {
        self.age_category.is_some() && self.bmi_category.is_some()
    }
}

/// Derive both buckets for every record, preserving order.
pub fn categorize(records: &[Record]) -> Vec<CategorizedRecord> {
    records.iter().copied().map(CategorizedRecord::new).collect()
}

/// Number of records with at least one undefined bucket.
pub fn out_of_domain_count(records: &[CategorizedRecord]) -> usize {
    records.iter().filter(|r| !r.is_categorized()).count()
}
