//! Synchronization engine for the tasklist application.
//!
//! This module provides the [`SyncEngine`] struct which keeps the remote task
//! service and the durable local store in step when connectivity comes and
//! goes. It offers:
//! - Loading the task list, merging remote tasks with locally pending ones
//! - Task mutations that fall back to local bookkeeping when the remote call fails
//! - Replay of queued offline mutations once connectivity is restored
//!
//! The persisted pending list is the only shared mutable state; every
//! read-modify-write of it goes through one lock, and remote calls are never
//! made while holding that lock.

pub mod ids;
pub mod load;
pub mod replay;
pub mod storage;
pub mod tasks;

pub use ids::OfflineIdGenerator;
pub use replay::ReconnectListener;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::connectivity::ConnectivityMonitor;
use crate::remote::TaskService;
use crate::storage::KeyValueStore;

/// Offline-first data layer sitting between the controller and its collaborators.
///
/// Cloning is cheap and every clone shares the same lock, replay guard and
/// id generator, so a clone can be handed to background tasks such as the
/// reconnect listener.
///
/// # Example
/// ```rust,no_run
/// use std::sync::Arc;
/// use tasklist::config::ApiConfig;
/// use tasklist::connectivity::ConnectivityMonitor;
/// use tasklist::remote::RestTaskService;
/// use tasklist::storage::MemoryStore;
/// use tasklist::sync::SyncEngine;
///
/// # async fn example() -> anyhow::Result<()> {
/// let remote = Arc::new(RestTaskService::new(&ApiConfig::default())?);
/// let store = Arc::new(MemoryStore::new());
/// let connectivity = Arc::new(ConnectivityMonitor::new(true));
/// let engine = SyncEngine::new(remote, store, connectivity);
///
/// let tasks = engine.load_tasks(5).await?;
/// let created = engine.create_task("Buy milk").await?;
/// engine.sync_offline_tasks().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SyncEngine {
    remote: Arc<dyn TaskService>,
    store: Arc<dyn KeyValueStore>,
    connectivity: Arc<ConnectivityMonitor>,
    pending_lock: Arc<Mutex<()>>,
    replay_in_progress: Arc<AtomicBool>,
    ids: Arc<OfflineIdGenerator>,
}

/// Outcome of a replay request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// Nothing has been stored locally yet, so there is nothing to replay
    Idle,
    /// Connectivity was down when the replay was requested
    Offline,
    /// Another replay was already running; this request was dropped
    InProgress,
    /// Every queued entry was attempted
    Completed {
        /// Entries confirmed by the remote service
        synced: usize,
        /// Entries left queued for the next attempt
        failed: usize,
    },
}

impl SyncStatus {
    /// Whether this replay confirmed at least one entry.
    pub fn synced_any(&self) -> bool {
        matches!(self, SyncStatus::Completed { synced, .. } if *synced > 0)
    }
}

impl SyncEngine {
    /// Creates a new `SyncEngine` over the given collaborators.
    pub fn new(
        remote: Arc<dyn TaskService>,
        store: Arc<dyn KeyValueStore>,
        connectivity: Arc<ConnectivityMonitor>,
    ) -> Self {
        Self {
            remote,
            store,
            connectivity,
            pending_lock: Arc::new(Mutex::new(())),
            replay_in_progress: Arc::new(AtomicBool::new(false)),
            ids: Arc::new(OfflineIdGenerator::new()),
        }
    }

    /// The connectivity monitor this engine consults before replaying.
    pub fn connectivity(&self) -> &Arc<ConnectivityMonitor> {
        &self.connectivity
    }

    /// Checks if a replay is currently in progress.
    pub fn is_syncing(&self) -> bool {
        self.replay_in_progress.load(Ordering::Acquire)
    }
}
