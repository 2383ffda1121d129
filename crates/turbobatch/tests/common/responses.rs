//! Canned Message Batches API responses

use serde_json::json;

fn batch(status: &str, processing: u32, succeeded: u32, errored: u32) -> serde_json::Value {
    json!({
        "id": super::BATCH_ID,
        "type": "message_batch",
        "processing_status": status,
        "request_counts": {
            "processing": processing,
            "succeeded": succeeded,
            "errored": errored,
            "canceled": 0,
            "expired": 0
        },
        "ended_at": null,
        "created_at": "2024-01-01T00:00:00Z",
        "expires_at": "2024-01-02T00:00:00Z",
        "results_url": null
    })
}

/// Batch create response (in progress, nothing done yet)
pub fn batch_create_response() -> serde_json::Value {
    batch("in_progress", 2, 0, 0)
}

/// Batch get response (half done)
pub fn batch_in_progress_response() -> serde_json::Value {
    batch("in_progress", 1, 1, 0)
}

/// Batch get response after a cancel request
pub fn batch_canceling_response() -> serde_json::Value {
    batch("canceling", 1, 1, 0)
}

/// Batch get response (completed)
pub fn batch_completed_response() -> serde_json::Value {
    let mut value = batch("ended", 0, 1, 1);
    value["ended_at"] = json!("2024-01-01T01:00:00Z");
    value["results_url"] = json!(format!(
        "https://api.anthropic.com/v1/messages/batches/{}/results",
        super::BATCH_ID
    ));
    value
}

/// Batch results JSONL for `request-1` (succeeded) and `request-2` (errored)
pub fn batch_results_jsonl() -> String {
    r#"{"custom_id":"request-1","result":{"type":"succeeded","message":{"id":"msg_01","type":"message","role":"assistant","content":[{"type":"text","text":"Result 1"}],"model":"claude-3-5-haiku-20241022","stop_reason":"end_turn","usage":{"input_tokens":10,"output_tokens":5}}}}
{"custom_id":"request-2","result":{"type":"errored","error":{"type":"invalid_request_error","message":"Invalid request"}}}
"#.to_string()
}

/// Error response - invalid request
pub fn error_invalid_request() -> serde_json::Value {
    json!({
        "type": "error",
        "error": {
            "type": "invalid_request_error",
            "message": "requests.0.params.max_tokens: Field required"
        }
    })
}

/// Error response - overloaded
pub fn error_overloaded() -> serde_json::Value {
    json!({
        "type": "error",
        "error": {
            "type": "overloaded_error",
            "message": "Overloaded"
        }
    })
}
