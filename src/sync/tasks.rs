use anyhow::Result;
use log::{info, warn};

use crate::models::{CompletionUpdate, CreateTaskArgs, Task, UpdateTaskArgs};
use crate::sync::SyncEngine;

impl SyncEngine {
    /// Creates a task, remotely if possible.
    ///
    /// If the remote service does not confirm the creation, a local task with
    /// a timestamp-derived id is queued at the front of the pending list and
    /// returned instead. Its id is replaced by the remote one once replayed,
    /// so callers must not hold on to it across a sync.
    ///
    /// `title` is expected to be non-blank; front ends filter blank input
    /// before calling (see [`TaskListController::add_task`]).
    ///
    /// [`TaskListController::add_task`]: crate::controller::TaskListController::add_task
    ///
    /// # Errors
    /// Only local storage failures are returned
    pub async fn create_task(&self, title: &str) -> Result<Task> {
        let args = CreateTaskArgs {
            title: title.to_string(),
            completed: false,
        };

        match self.remote.create(args).await {
            Ok(mut task) => {
                task.mark_synced();
                info!("✅ Created task {} remotely", task.id);
                Ok(task)
            }
            Err(e) => {
                warn!("❌ Failed to create task, saving locally: {e}");
                let task = Task::new_offline(self.ids.next_id(), title);

                let _guard = self.pending_lock.lock().await;
                let mut tasks = self.read_pending().await?.unwrap_or_default();
                tasks.insert(0, task.clone());
                self.write_pending(&tasks).await?;

                info!("📴 Queued task {} for creation", task.id);
                Ok(task)
            }
        }
    }

    /// Marks a task completed or not.
    ///
    /// On remote failure the matching pending entry takes the new value and is
    /// flagged `offline`; no other entry is touched. An entry that was never
    /// created remotely keeps `is_new`, so replay still creates it.
    ///
    /// # Returns
    /// The remote echo, or `{id, completed}` as given when the remote call failed
    pub async fn set_completed(&self, id: i64, completed: bool) -> Result<CompletionUpdate> {
        match self.remote.update_partial(id, UpdateTaskArgs::completed(completed)).await {
            Ok(task) => {
                info!("✅ Updated task {id} remotely");
                Ok(CompletionUpdate {
                    id: task.id,
                    completed: task.completed,
                })
            }
            Err(e) => {
                warn!("❌ Failed to update task {id}, modifying locally: {e}");

                let _guard = self.pending_lock.lock().await;
                if let Some(mut tasks) = self.read_pending().await? {
                    match tasks.iter().position(|task| task.id == id) {
                        Some(index) => {
                            let task = &mut tasks[index];
                            task.completed = completed;
                            task.offline = true;
                            // is_new is left as is: true only for never-created entries
                            self.write_pending(&tasks).await?;
                            info!("📴 Queued update for task {id}");
                        }
                        None => warn!("⚠️  Task {id} is not stored locally, update not queued"),
                    }
                }

                Ok(CompletionUpdate { id, completed })
            }
        }
    }

    /// Deletes a task.
    ///
    /// On remote failure the task is dropped from the pending list and is not
    /// queued for a remote delete; it may reappear on the next successful load.
    ///
    /// # Returns
    /// `true` if the remote service confirmed the deletion
    pub async fn delete_task(&self, id: i64) -> Result<bool> {
        match self.remote.delete(id).await {
            Ok(()) => {
                info!("✅ Deleted task {id} remotely");
                Ok(true)
            }
            Err(e) => {
                warn!("❌ Failed to delete task {id}, removing locally: {e}");

                let _guard = self.pending_lock.lock().await;
                if let Some(mut tasks) = self.read_pending().await? {
                    tasks.retain(|task| task.id != id);
                    self.write_pending(&tasks).await?;
                }

                Ok(false)
            }
        }
    }
}
