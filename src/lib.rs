//! # insurance_dash
//!
//! Terminal dashboard over the medical insurance dataset
//! (`age,sex,bmi,children,smoker,region,charges`).
//!
//! - `csv_reader`: loads the CSV into typed [`Record`]s
//! - `dataset`: the immutable [`Dataset`] handle shared by every page
//! - `categorizer`: age and BMI buckets
//! - `estimator`: mean charge of the records matching a [`Query`]
//! - `aggregates`: the grouped figures behind each chart
//! - `dashboard`: Dataset View, Graphs and Charge Calculator pages

pub mod aggregates;
pub mod categorizer;
pub mod config;
pub mod csv_reader;
pub mod dashboard;
pub mod dataset;
pub mod estimator;

pub use categorizer::{categorize, AgeCategory, BmiCategory, CategorizedRecord};
pub use config::Config;
pub use dataset::{Dataset, Record, Region, Sex, Smoker};
pub use estimator::{estimate, Estimate, Query};

/// Result type for insurance_dash operations
pub type Result<T> = std::result::Result<T, DashError>;

/// Main error type for insurance_dash
#[derive(Debug, thiserror::Error)]
pub enum DashError {
    #[error("Dataset unavailable ({source_name}): {reason}")]
    DataUnavailable { source_name: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashError {
    pub(crate) fn unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        DashError::DataUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}
