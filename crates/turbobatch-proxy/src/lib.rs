//! # turbobatch-proxy
//!
//! A stateless edge proxy in front of the Message Batches API. Browsers call
//! it instead of the API directly; it answers CORS preflights, forwards the
//! caller's key and version headers, and turns the line-delimited results
//! stream into a plain JSON array.
//!
//! ```rust,no_run
//! use turbobatch_proxy::{ProxyConfig, serve};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), turbobatch_proxy::ProxyError> {
//!     serve(ProxyConfig::default()).await
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handler;
pub mod route;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use route::UpstreamRoute;

/// Shared, immutable handler state.
#[derive(Debug, Clone)]
pub struct ProxyState {
    http: reqwest::Client,
    config: Arc<ProxyConfig>,
}

impl ProxyState {
    /// Build the upstream client for `config`.
    pub fn new(config: ProxyConfig) -> Result<Self, ProxyError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("turbobatch-proxy/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ProxyError::Client)?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// The configuration this state was built from.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// The proxy application: every path and method lands on one handler.
///
/// Batch-creation bodies are forwarded whatever their size; the upstream
/// enforces its own limit.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .fallback(handler::proxy)
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
}

/// Bind `config.bind` and serve until the process is stopped.
pub async fn serve(config: ProxyConfig) -> Result<(), ProxyError> {
    let bind = config.bind;
    let upstream = config.upstream_base().to_string();
    let app = router(ProxyState::new(config)?);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(%bind, %upstream, "Proxy listening");
    axum::serve(listener, app).await?;
    Ok(())
}
