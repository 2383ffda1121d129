//! Proxy configuration

use std::net::SocketAddr;
use std::time::Duration;

/// Default listen address, the port a local worker dev server uses.
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";

/// Settings for one proxy instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Address to listen on
    pub bind: SocketAddr,

    /// Upstream API root; batch paths are appended to it
    pub upstream_base: String,

    /// `anthropic-version` sent when the caller supplies none
    pub default_api_version: String,

    /// Per-request upstream timeout
    pub timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8787)),
            upstream_base: turbobatch::DEFAULT_BASE_URL.to_string(),
            default_api_version: turbobatch::DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(600),
        }
    }
}

impl ProxyConfig {
    /// Replace the upstream root.
    pub fn with_upstream(mut self, upstream_base: impl Into<String>) -> Self {
        self.upstream_base = upstream_base.into();
        self
    }

    /// Replace the listen address.
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    /// Upstream root without surrounding whitespace or trailing slashes.
    pub fn upstream_base(&self) -> &str {
        self.upstream_base.trim().trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.upstream_base(), "https://api.anthropic.com/v1");
        assert_eq!(config.default_api_version, "2023-06-01");
    }

    #[test]
    fn test_upstream_base_strips_trailing_slash() {
        let config = ProxyConfig::default().with_upstream(" http://localhost:9000/v1// ");
        assert_eq!(config.upstream_base(), "http://localhost:9000/v1");
    }
}
