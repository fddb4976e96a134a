use anyhow::Result;
use log::error;

use crate::constants::TASKS_STORAGE_KEY;
use crate::models::Task;
use crate::sync::SyncEngine;

impl SyncEngine {
    /// Returns the persisted pending list without modifying it.
    ///
    /// # Returns
    /// The stored tasks, or an empty vector if nothing has been stored yet
    pub async fn pending_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.read_pending().await?.unwrap_or_default())
    }

    /// Read the pending list.
    ///
    /// `None` means the key was never written. A value that no longer parses
    /// is logged and treated as absent so the next write replaces it.
    pub(super) async fn read_pending(&self) -> Result<Option<Vec<Task>>> {
        let Some(raw) = self.store.get(TASKS_STORAGE_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(tasks) => Ok(Some(tasks)),
            Err(e) => {
                error!("❌ Stored task list is unreadable, ignoring it: {e}");
                Ok(None)
            }
        }
    }

    /// Persist the whole pending list in one write.
    pub(super) async fn write_pending(&self, tasks: &[Task]) -> Result<()> {
        let raw = serde_json::to_string(tasks)?;
        self.store.set(TASKS_STORAGE_KEY, &raw).await
    }
}
