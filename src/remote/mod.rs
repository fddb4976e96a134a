//! Remote task service abstraction.
//!
//! This module defines the interface the sync engine uses to talk to the
//! remote source of truth, along with the single error kind it can fail with.

use async_trait::async_trait;

use crate::models::{CreateTaskArgs, Task, UpdateTaskArgs};

pub mod rest;

pub use rest::RestTaskService;

/// Errors a remote call can fail with.
///
/// Every variant means "the remote service did not confirm the operation";
/// callers degrade to offline bookkeeping regardless of which one occurred.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Unexpected status: {status}")]
    Status { status: u16 },

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            RemoteError::Timeout
        } else if error.is_decode() {
            RemoteError::InvalidData(error.to_string())
        } else if let Some(status) = error.status() {
            RemoteError::Status { status: status.as_u16() }
        } else {
            RemoteError::Network(error.to_string())
        }
    }
}

/// CRUD contract of the remote task resource.
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn list(&self, limit: u32) -> Result<Vec<Task>, RemoteError>;
    async fn create(&self, args: CreateTaskArgs) -> Result<Task, RemoteError>;
    async fn update_partial(&self, id: i64, args: UpdateTaskArgs) -> Result<Task, RemoteError>;
    async fn delete(&self, id: i64) -> Result<(), RemoteError>;
}
