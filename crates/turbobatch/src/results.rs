//! Result stream parsing
//!
//! The results endpoint answers with one JSON object per line. A line that
//! does not parse is dropped and logged; only a body with no usable line at
//! all is an error. The same parser backs the edge proxy, which forwards the
//! surviving objects as a JSON array, so [`parse_result_records`] accepts that
//! array form too.

use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::types::{Outcome, ResultRecord};

const UNKNOWN_ERROR: &str = "Unknown error";

/// Parse a line-delimited JSON body into its objects, in line order.
///
/// Blank lines are ignored. Lines that fail to parse are skipped.
///
/// # Errors
///
/// [`Error::NoValidResults`] when no line parses.
pub fn parse_jsonl(body: &str) -> Result<Vec<Value>> {
    let mut lines = 0usize;
    let mut values = Vec::new();

    for (index, line) in body.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        lines += 1;

        match serde_json::from_str::<Value>(line) {
            Ok(value) => values.push(value),
            Err(e) => warn!(line = index + 1, error = %e, "Skipping malformed result line"),
        }
    }

    if values.is_empty() {
        return Err(Error::NoValidResults { lines });
    }

    Ok(values)
}

/// Parse a results body into records, in line order.
///
/// The body is either line-delimited JSON straight from the API or a JSON
/// array of the same objects. Entries without a `custom_id` or `result.type`
/// are skipped like malformed lines.
pub fn parse_result_records(body: &str) -> Result<Vec<ResultRecord>> {
    let values = match serde_json::from_str::<Value>(body.trim()) {
        Ok(Value::Array(items)) => items,
        _ => parse_jsonl(body)?,
    };

    let examined = values.len();
    let records: Vec<ResultRecord> = values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let record = record_from_value(value);
            if record.is_none() {
                warn!(entry = index + 1, "Skipping result entry without custom_id or type");
            }
            record
        })
        .collect();

    if records.is_empty() {
        return Err(Error::NoValidResults { lines: examined });
    }

    Ok(records)
}

/// Convert one parsed result object into a record.
pub fn record_from_value(value: &Value) -> Option<ResultRecord> {
    let custom_id = match value.get("custom_id")? {
        Value::String(id) => id.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    let result = value.get("result")?;
    let kind = result.get("type")?.as_str()?;

    let outcome = match kind {
        "succeeded" => Outcome::Succeeded {
            text: result
                .pointer("/message/content/0/text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        "errored" => Outcome::Errored {
            message: result
                .pointer("/error/message")
                .or_else(|| result.pointer("/error/error/message"))
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_ERROR)
                .to_string(),
        },
        other => Outcome::Other {
            kind: other.to_string(),
        },
    };

    Some(ResultRecord { custom_id, outcome })
}
