//! Request construction
//!
//! Turns input records plus a validated [`SubmissionConfig`] into the batch
//! request list, one request per record, in record order.

use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use crate::config::SubmissionConfig;
use crate::error::{Error, Result};
use crate::types::{BatchRequest, InputRecord, MessageParam, MessageParams, SystemPromptBlock};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Generate a random request id: `req_` followed by nine base-36 characters.
pub fn generate_custom_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect();
    format!("req_{}", suffix)
}

/// Check a record list before it is turned into a batch.
///
/// Rejects an empty list and any supplied id used by more than one record.
pub fn validate_records(records: &[InputRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(Error::validation("records", "No input records to submit"));
    }

    let mut seen = HashSet::with_capacity(records.len());
    for id in records.iter().filter_map(InputRecord::supplied_id) {
        if !seen.insert(id) {
            return Err(Error::validation(
                "records",
                format!("Duplicate custom_id in input: {}", id),
            ));
        }
    }

    Ok(())
}

/// Build one batch request per record, preserving order.
///
/// The config is validated first, so a bad `max_tokens` fails here without
/// producing any request. Records without an id get a generated one that is
/// unique within the batch.
pub fn build_requests(records: &[InputRecord], config: &SubmissionConfig) -> Result<Vec<BatchRequest>> {
    config.validate()?;

    let system = config
        .system_prompt()
        .map(|prompt| vec![SystemPromptBlock::text_cached(prompt)]);

    let mut used: HashSet<String> = records
        .iter()
        .filter_map(|r| r.supplied_id().map(String::from))
        .collect();

    let requests: Vec<BatchRequest> = records
        .iter()
        .map(|record| {
            let custom_id = match record.supplied_id() {
                Some(id) => id.to_string(),
                None => unique_custom_id(&mut used),
            };

            BatchRequest {
                custom_id,
                params: MessageParams {
                    model: config.model.trim().to_string(),
                    max_tokens: config.max_tokens,
                    system: system.clone(),
                    messages: vec![MessageParam::user(record.message.clone())],
                },
            }
        })
        .collect();

    debug!(
        count = requests.len(),
        cached_system = system.is_some(),
        "Built batch requests"
    );

    Ok(requests)
}

fn unique_custom_id(used: &mut HashSet<String>) -> String {
    loop {
        let candidate = generate_custom_id();
        if used.insert(candidate.clone()) {
            return candidate;
        }
    }
}
