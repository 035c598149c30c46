use axum::http::StatusCode;
use thiserror::Error;

/// ChunkError
///
/// Failures raised by a `ChunkStore` while fetching a view chunk.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChunkError {
    /// The chunk name contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid chunk name: {0:?}")]
    InvalidName(String),
    #[error("chunk not found: {0}")]
    NotFound(String),
    /// Reading the chunk file failed for a reason other than absence.
    #[error("failed to read chunk {chunk}: {message}")]
    Io { chunk: String, message: String },
    /// The store is temporarily unable to serve chunks.
    #[error("chunk store unavailable: {0}")]
    Unavailable(String),
}

impl ChunkError {
    /// Maps the failure onto the status returned by the `/chunks/{chunk}` endpoint.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ChunkError::InvalidName(_) | ChunkError::NotFound(_) => StatusCode::NOT_FOUND,
            ChunkError::Io { .. } | ChunkError::Unavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// NavigationError
///
/// The error channel of the navigator. An unknown path and a failed chunk fetch
/// are the only two ways a navigation can fail.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NavigationError {
    #[error("no route matches {0}")]
    NotFound(String),
    #[error("failed to load chunk {chunk} for route {route}")]
    ChunkLoad {
        route: String,
        chunk: String,
        #[source]
        source: ChunkError,
    },
}

impl NavigationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            NavigationError::NotFound(_) => StatusCode::NOT_FOUND,
            NavigationError::ChunkLoad { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn chunk_errors_map_to_http_statuses() {
        assert_eq!(
            ChunkError::NotFound("about".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ChunkError::InvalidName("../etc".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ChunkError::Unavailable("down".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn chunk_load_keeps_its_source() {
        let err = NavigationError::ChunkLoad {
            route: "teams".into(),
            chunk: "teams".into(),
            source: ChunkError::NotFound("teams".into()),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "failed to load chunk teams for route teams");
        assert_eq!(err.source().unwrap().to_string(), "chunk not found: teams");
    }
}
