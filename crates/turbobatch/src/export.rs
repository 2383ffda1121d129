//! CSV export of batch results
//!
//! One row per result under the header
//! `Custom ID, Status, Message Content, Error`. Every cell is quoted and
//! embedded quotes are doubled, so message text with commas or newlines
//! survives a round trip.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{Outcome, ResultRecord};

/// Column headers of the results export.
pub const CSV_HEADERS: [&str; 4] = ["Custom ID", "Status", "Message Content", "Error"];

/// Write results as CSV to any writer.
pub fn write_csv<W: Write>(records: &[ResultRecord], writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);

    writer.write_record(CSV_HEADERS)?;

    for record in records {
        writer.write_record([
            record.custom_id.as_str(),
            record.status(),
            record.text().unwrap_or(""),
            record.error_message().unwrap_or(""),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Render results as a CSV string.
pub fn to_csv_string(records: &[ResultRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Write results to a CSV file, replacing it if it exists.
pub fn write_csv_file(records: &[ResultRecord], path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    write_csv(records, file)
}

/// Parse an export produced by [`write_csv`] back into records.
///
/// `succeeded` rows carry the message text, `errored` rows the error, and any
/// other status becomes [`Outcome::Other`].
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ResultRecord>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let field = |i: usize| row.get(i).unwrap_or_default().to_string();

        let outcome = match row.get(1).unwrap_or_default() {
            "succeeded" => Outcome::Succeeded { text: field(2) },
            "errored" => Outcome::Errored { message: field(3) },
            other => Outcome::Other {
                kind: other.to_string(),
            },
        };

        records.push(ResultRecord {
            custom_id: field(0),
            outcome,
        });
    }

    Ok(records)
}
