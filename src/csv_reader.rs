use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::dataset::{Record, COLUMNS};
use crate::DashError;

/// Read every record from the CSV file at `path`.
///
/// # Errors
/// `DashError::DataUnavailable` if the file is missing, the header differs
/// from `age,sex,bmi,children,smoker,region,charges`, a row does not parse,
/// or a row holds a non-finite `bmi` or `charges`.
pub fn read_data<P: AsRef<Path>>(path: P) -> crate::Result<Vec<Record>> {
    let path = path.as_ref();
    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|e| DashError::unavailable(&source_name, e))?;
    read_source(file, &source_name)
}

/// Same as [`read_data`] for any reader.
pub fn read_from_reader<R: Read>(reader: R) -> crate::Result<Vec<Record>> {
    read_source(reader, "<reader>")
}

fn read_source<R: Read>(reader: R, source_name: &str) -> crate::Result<Vec<Record>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| DashError::unavailable(source_name, e))?
        .clone();
    check_headers(&headers).map_err(|reason| DashError::unavailable(source_name, reason))?;

    let mut records = Vec::<Record>::new();
    for result in rdr.records() {
        let row = result.map_err(|e| DashError::unavailable(source_name, e))?;
        let record: Record = row
            .deserialize(Some(&headers))
            .map_err(|e| DashError::unavailable(source_name, e))?;
        check_finite(&record).map_err(|field| {
            let line = row.position().map_or(0, |p| p.line());
            DashError::unavailable(source_name, format!("line: {line}: {field} is not a finite number"))
        })?;
        records.push(record);
    }

    tracing::info!("Loaded {} records from {}", records.len(), source_name);
    Ok(records)
}

fn check_headers(headers: &csv::StringRecord) -> Result<(), String> {
    let found: Vec<&str> = headers.iter().map(str::trim).collect();
    if found == COLUMNS {
        Ok(())
    } else {
        Err(format!(
            "expected header `{}`, found `{}`",
            COLUMNS.join(","),
            found.join(",")
        ))
    }
}

/// `bmi` and `charges` feed every mean; NaN or infinite values would leak
/// into estimates.
fn check_finite(record: &Record) -> Result<(), &'static str> {
    if !record.bmi.is_finite() {
        Err("bmi")
    } else if !record.charges.is_finite() {
        Err("charges")
    } else {
        Ok(())
    }
}

/// Write records in the same format [`read_data`] accepts, header included
/// even when `records` is empty.
pub fn write_records<W: Write>(writer: W, records: &[Record]) -> crate::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(COLUMNS)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
