//! Proxy command implementation.

use std::net::SocketAddr;

use turbobatch_proxy::ProxyConfig;

/// Execute the proxy command; runs until interrupted.
pub async fn execute(bind: SocketAddr, upstream: String) -> anyhow::Result<()> {
    let config = ProxyConfig::default().with_bind(bind).with_upstream(upstream);
    turbobatch_proxy::serve(config).await?;
    Ok(())
}
