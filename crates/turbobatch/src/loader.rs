//! Input record loading
//!
//! Reads the ordered record list from a CSV file with `custom_id` and
//! `user_message` columns, or from a JSONL file with the same fields. Record
//! order is file order.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::InputRecord;

/// Supported input file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated with a header row
    Csv,
    /// One JSON object per line
    Jsonl,
}

impl InputFormat {
    /// Pick the format from a file extension (`.jsonl`/`.ndjson` or CSV).
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("jsonl") | Some("ndjson") => Self::Jsonl,
            _ => Self::Csv,
        }
    }
}

/// Load input records from a file, choosing the format by extension.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<InputRecord>> {
    let path = path.as_ref();
    let format = InputFormat::from_path(path);
    let file = File::open(path)?;

    let records = match format {
        InputFormat::Csv => read_csv_records(file)?,
        InputFormat::Jsonl => read_jsonl_records(BufReader::new(file))?,
    };

    debug!(path = %path.display(), ?format, count = records.len(), "Loaded input records");
    Ok(records)
}

/// Read records from CSV with `custom_id` and `user_message` headers.
///
/// `custom_id` may be absent or empty.
pub fn read_csv_records<R: Read>(reader: R) -> Result<Vec<InputRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in reader.deserialize::<InputRecord>() {
        let mut record = row?;
        if record.supplied_id().is_none() {
            record.id = None;
        }
        records.push(record);
    }

    Ok(records)
}

/// Read records from JSONL, one object per non-blank line.
///
/// Numeric `custom_id` values are stringified.
pub fn read_jsonl_records<R: BufRead>(reader: R) -> Result<Vec<InputRecord>> {
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let value: serde_json::Value = serde_json::from_str(&line)?;
        let record = InputRecord::from_json(&value).ok_or_else(|| {
            Error::validation(
                "records",
                format!("Line {}: expected an object with a string user_message", index + 1),
            )
        })?;
        records.push(record);
    }

    Ok(records)
}
