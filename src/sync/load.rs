use anyhow::Result;
use log::{info, warn};
use std::collections::HashSet;

use crate::models::Task;
use crate::sync::SyncEngine;

/// Remote tasks first, then the locally pending ones, one entry per id.
///
/// Entries of `local` that are not `offline` are dropped: the remote list is
/// authoritative for them. When ids collide the remote copy wins.
pub fn merge_tasks(remote: Vec<Task>, local: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::with_capacity(remote.len() + local.len());

    remote
        .into_iter()
        .chain(local.into_iter().filter(Task::is_pending))
        .filter(|task| seen.insert(task.id))
        .collect()
}

impl SyncEngine {
    /// Loads the task list, preferring the remote service.
    ///
    /// On success the remote tasks are merged with locally pending ones (see
    /// [`merge_tasks`]), and the merged list is persisted and returned. When
    /// the remote service cannot be reached the last persisted list is
    /// returned unchanged.
    ///
    /// # Arguments
    /// * `limit` - Maximum number of tasks requested from the remote service
    ///
    /// # Errors
    /// Only local storage failures are returned; remote failures fall back to
    /// the stored list
    pub async fn load_tasks(&self, limit: u32) -> Result<Vec<Task>> {
        match self.remote.list(limit).await {
            Ok(remote_tasks) => {
                info!("✅ Fetched {} tasks from remote", remote_tasks.len());

                let _guard = self.pending_lock.lock().await;
                let local_tasks = self.read_pending().await?.unwrap_or_default();
                let merged = merge_tasks(remote_tasks, local_tasks);
                self.write_pending(&merged).await?;

                Ok(merged)
            }
            Err(e) => {
                warn!("❌ Failed to fetch tasks, loading from storage: {e}");
                self.pending_tasks().await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, title: &str, offline: bool) -> Task {
        Task {
            id,
            title: title.to_string(),
            completed: false,
            offline,
            is_new: false,
        }
    }

    #[test]
    fn test_merge_appends_only_offline_entries() {
        let remote = vec![task(1, "A", false), task(2, "B", false)];
        let local = vec![task(3, "stale", false), task(4, "queued", true)];

        let merged = merge_tasks(remote, local);
        let ids: Vec<i64> = merged.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_merge_prefers_remote_copy_on_collision() {
        let remote = vec![task(1, "remote", false)];
        let local = vec![task(1, "local edit", true)];

        let merged = merge_tasks(remote, local);
        assert_eq!(merged, vec![task(1, "remote", false)]);
    }

    #[test]
    fn test_merge_with_empty_remote_keeps_queue_order() {
        let local = vec![task(9, "first", true), task(3, "second", true)];
        let merged = merge_tasks(Vec::new(), local.clone());
        assert_eq!(merged, local);
    }
}
