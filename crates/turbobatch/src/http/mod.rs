//! HTTP layer
//!
//! A thin provider abstraction over `reqwest`: one buffered exchange per call,
//! structured request/response logging, no hidden retries.

pub use anthropic_provider::{AnthropicHttpProvider, AnthropicHttpProviderBuilder};
pub use provider::HttpProvider;
pub use request::RequestBuilder;
pub use response::Response;

mod anthropic_provider;
pub mod provider;
mod request;
mod response;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, Method, StatusCode};
