//! Error types for the Ghibli API client.

use crate::graph::EntityKind;

/// A failure to fetch one of the five collections. Any of them failing fails
/// the whole refresh.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request for {kind} failed")]
    Request {
        kind: EntityKind,
        #[source]
        source: reqwest::Error,
    },
    #[error("{kind} endpoint returned status {status}")]
    Status {
        kind: EntityKind,
        status: u16,
        url: String,
    },
    #[error("failed to decode {kind} response")]
    Decode {
        kind: EntityKind,
        #[source]
        source: anyhow::Error,
    },
}

impl FetchError {
    pub fn kind(&self) -> EntityKind {
        match self {
            FetchError::Request { kind, .. }
            | FetchError::Status { kind, .. }
            | FetchError::Decode { kind, .. } => *kind,
        }
    }

    /// Whether the request never produced a response within the client timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Request { source, .. } if source.is_timeout())
    }
}
