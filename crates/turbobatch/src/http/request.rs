//! HTTP request builder

use super::Response;
use crate::error::{Error, Result};
use crate::observability::CallLog;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use std::time::Duration;
use url::Url;

/// Builder for a single HTTP exchange.
///
/// Sends exactly once. Retrying is the caller's decision (see the poll loop),
/// since a batch submission must never be repeated behind its back.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: Url,
    path: String,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub(crate) fn new(client: reqwest::Client, method: Method, url: Url, path: &str) -> Self {
        Self {
            method,
            url,
            path: path.to_string(),
            headers: HeaderMap::new(),
            body: None,
            timeout: Duration::from_secs(600),
            http_client: client,
        }
    }

    /// Set a header, returning an error if the name or value is invalid.
    pub fn try_header(mut self, key: &str, value: &str) -> Result<Self> {
        let name = key
            .parse::<HeaderName>()
            .map_err(|e| Error::HttpClient(format!("Invalid header name '{}': {}", key, e)))?;
        let value = value
            .parse::<HeaderValue>()
            .map_err(|e| Error::HttpClient(format!("Invalid header value for '{}': {}", key, e)))?;

        self.headers.insert(name, value);
        Ok(self)
    }

    /// Set the request body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send the request and buffer the response.
    ///
    /// Only transport failures are errors here; any HTTP status comes back as
    /// a [`Response`].
    pub async fn send(self) -> Result<Response> {
        let call = CallLog::start(
            self.method.as_str(),
            &self.path,
            self.body.as_ref().map(Vec::len),
        );
        let timeout = self.timeout;
        let into_error = |e: reqwest::Error| {
            if e.is_timeout() {
                Error::Timeout(timeout)
            } else {
                Error::from(e)
            }
        };

        let mut req = self
            .http_client
            .request(self.method, self.url)
            .timeout(timeout)
            .headers(self.headers);
        if let Some(body) = self.body {
            req = req.body(body);
        }

        let resp = req.send().await.map_err(|e| {
            call.failed(&e);
            into_error(e)
        })?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(|e| {
            call.failed(&e);
            into_error(e)
        })?;

        let elapsed = call.finished(status.as_u16(), body.len());
        Ok(Response::new(status, headers, body, elapsed))
    }

    /// Get the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> RequestBuilder {
        RequestBuilder::new(
            reqwest::Client::new(),
            Method::GET,
            Url::parse("https://api.anthropic.com/v1/messages/batches").unwrap(),
            "/messages/batches",
        )
    }

    #[test]
    fn test_try_header() {
        let req = builder().try_header("anthropic-version", "2023-06-01").unwrap();
        assert_eq!(req.headers()["anthropic-version"], "2023-06-01");
        assert_eq!(req.method(), Method::GET);
    }

    #[test]
    fn test_try_header_rejects_invalid_value() {
        let err = builder().try_header("x-api-key", "bad\nkey").unwrap_err();
        assert!(matches!(err, Error::HttpClient(_)));
        // the value itself must not leak into the message
        assert!(!err.to_string().contains("bad\nkey"));
    }
}
