//! Cancel command implementation.

use super::{GlobalArgs, parse_batch_id, print_handle};

/// Execute the cancel command.
///
/// Cancellation is asynchronous upstream; the batch usually reports
/// `canceling` first.
pub async fn execute(global: &GlobalArgs, batch_id: &str) -> anyhow::Result<()> {
    let batch_id = parse_batch_id(batch_id)?;
    let handle = global.client()?.cancel(&batch_id).await?;
    print_handle(&handle);
    Ok(())
}
