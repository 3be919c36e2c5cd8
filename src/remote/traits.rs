//! Remote source trait definitions
//!
//! The sync orchestrator only talks to the file server through these traits,
//! so tests can swap in an in-memory source.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Remote source error types. All of them are transient: the next scheduled
/// run simply tries again.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Connect failed: {0}")]
    Connect(String),

    #[error("Listing failed: {0}")]
    List(String),

    #[error("Fetch of {name} failed: {message}")]
    Fetch { name: String, message: String },
}

/// Result type for remote operations
pub type RemoteResult<T> = Result<T, RemoteError>;

// ============================================================================
// Listing Types
// ============================================================================

/// One entry of a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub name: String,
    pub modified_at: DateTime<Utc>,
}

impl RemoteFile {
    pub fn new(name: impl Into<String>, modified_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            modified_at,
        }
    }
}

// ============================================================================
// Source Traits
// ============================================================================

/// A file server that publishes the directory
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Host description used in logs
    fn describe(&self) -> String;

    /// Open a session against the server
    async fn connect(&self) -> RemoteResult<Box<dyn RemoteSession>>;
}

/// An open connection to a [`RemoteSource`]
#[async_trait]
pub trait RemoteSession: Send {
    /// List the files in the working directory
    async fn list(&mut self) -> RemoteResult<Vec<RemoteFile>>;

    /// Download a file's full contents
    async fn fetch(&mut self, name: &str) -> RemoteResult<Bytes>;

    /// Close the session. Failures here are not reported to the caller.
    async fn disconnect(self: Box<Self>);
}
