//! Mapping of incoming paths onto upstream batch endpoints

use turbobatch::BatchId;

use crate::error::ProxyError;

/// Upstream endpoint a request is forwarded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamRoute {
    /// `/messages/batches`
    Create,
    /// `/messages/batches/{id}`
    Retrieve(BatchId),
    /// `/messages/batches/{id}/results`
    Results(BatchId),
    /// `/messages/batches/{id}/cancel`
    Cancel(BatchId),
}

impl UpstreamRoute {
    /// Route an incoming path.
    ///
    /// Paths outside `messages/batches` go to the creation endpoint. Empty
    /// segments are ignored, so `//messages//batches/` is `Create`.
    pub fn from_path(path: &str) -> Result<Self, ProxyError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["messages", "batches", id, rest @ ..] => {
                let id = BatchId::parse(id).map_err(ProxyError::InvalidBatchId)?;
                Ok(match rest.first() {
                    Some(&"results") => Self::Results(id),
                    Some(&"cancel") => Self::Cancel(id),
                    _ => Self::Retrieve(id),
                })
            }
            _ => Ok(Self::Create),
        }
    }

    /// Path appended to the upstream base.
    pub fn upstream_path(&self) -> String {
        match self {
            Self::Create => "/messages/batches".to_string(),
            Self::Retrieve(id) => format!("/messages/batches/{}", id),
            Self::Results(id) => format!("/messages/batches/{}/results", id),
            Self::Cancel(id) => format!("/messages/batches/{}/cancel", id),
        }
    }

    /// Whether the upstream answers with line-delimited JSON.
    pub fn is_results(&self) -> bool {
        matches!(self, Self::Results(_))
    }
}
