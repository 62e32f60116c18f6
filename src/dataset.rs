use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::prelude::*;
use serde::{Deserialize, Serialize};

use crate::csv_reader;

/// Header of the insurance CSV, in file order.
pub const COLUMNS: &[&str] = &["age", "sex", "bmi", "children", "smoker", "region", "charges"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Smoker {
    No,
    Yes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }
}

impl Smoker {
    pub const ALL: [Smoker; 2] = [Smoker::No, Smoker::Yes];

    pub fn as_str(self) -> &'static str {
        match self {
            Smoker::No => "no",
            Smoker::Yes => "yes",
        }
    }
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Northeast,
        Region::Northwest,
        Region::Southeast,
        Region::Southwest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Northeast => "northeast",
            Region::Northwest => "northwest",
            Region::Southeast => "southeast",
            Region::Southwest => "southwest",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Sex, Smoker, Region);

/// One row of the insurance dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub age: u32,
    pub sex: Sex,
    pub bmi: f64,
    pub children: u32,
    pub smoker: Smoker,
    pub region: Region,
    pub charges: f64,
}

/// Immutable, cheaply cloneable handle to a loaded dataset.
///
/// Every page receives its own clone; the rows behind it are never mutated.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[Record]>,
    source: String,
    loaded_at: DateTime<Local>,
}

impl Dataset {
    /// Load the dataset from a CSV file.
    ///
    /// # Errors
    /// Returns `DashError::DataUnavailable` if the file cannot be opened or
    /// does not match the expected schema.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let records = csv_reader::read_data(path)?;
        Ok(Self::from_records(records, path.display().to_string()))
    }

    pub fn from_records(records: Vec<Record>, source: impl Into<String>) -> Self {
        Self {
            records: records.into(),
            source: source.into(),
            loaded_at: Local::now(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> Vec<&'static str> {
        Vec::from(COLUMNS)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Local> {
        self.loaded_at
    }
}
