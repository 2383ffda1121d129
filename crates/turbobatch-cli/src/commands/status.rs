//! Status command implementation.

use super::{GlobalArgs, parse_batch_id, print_handle};

/// Execute the status command.
pub async fn execute(global: &GlobalArgs, batch_id: &str) -> anyhow::Result<()> {
    let batch_id = parse_batch_id(batch_id)?;
    let handle = global.client()?.retrieve(&batch_id).await?;
    print_handle(&handle);
    Ok(())
}
