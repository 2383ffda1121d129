//! Check command implementation.

use colored::Colorize;

use super::GlobalArgs;

/// Execute the check command.
///
/// Sends a preflight to the endpoint; the API key is optional here.
pub async fn execute(global: &GlobalArgs) -> anyhow::Result<()> {
    let client = global.check_client()?;

    if let Err(e) = client.check_endpoint().await {
        anyhow::bail!("Connection failed: {}", e);
    }

    println!("{}", "Endpoint connection successful".green());
    Ok(())
}
