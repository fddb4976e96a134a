//! Local storage module for the durable task cache
//!
//! The sync engine only needs a string key/value store. This module provides
//! the [`KeyValueStore`] seam and two implementations:
//! - [`LocalStorage`], SQLite through SeaORM, survives restarts
//! - [`MemoryStore`], process-local, used by tests and throwaway sessions

pub mod db;
pub mod memory;

pub use db::LocalStorage;
pub use memory::MemoryStore;

use anyhow::Result;
use async_trait::async_trait;

/// Durable key/value persistence.
///
/// Values are opaque strings; callers always read-modify-write a key as a
/// whole.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
