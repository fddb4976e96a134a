//! Presentation-facing façade over the sync engine.
//!
//! [`TaskListController`] owns the list a front end renders and keeps it in
//! step with the results of [`SyncEngine`] operations. Front ends never talk
//! to the remote service or the local store directly.

use anyhow::Result;
use log::debug;

use crate::models::{CompletionUpdate, Task};
use crate::sync::{SyncEngine, SyncStatus};

pub struct TaskListController {
    engine: SyncEngine,
    tasks: Vec<Task>,
    list_limit: u32,
}

impl TaskListController {
    pub fn new(engine: SyncEngine, list_limit: u32) -> Self {
        Self {
            engine,
            tasks: Vec::new(),
            list_limit,
        }
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    /// Tasks in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Number of displayed tasks still waiting for the remote service.
    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_pending()).count()
    }

    /// Reload the list through the engine.
    pub async fn refresh(&mut self) -> Result<&[Task]> {
        self.tasks = self.engine.load_tasks(self.list_limit).await?;
        Ok(&self.tasks)
    }

    /// Add a task to the top of the list.
    ///
    /// Blank titles are ignored and yield `None`.
    pub async fn add_task(&mut self, title: &str) -> Result<Option<Task>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        let task = self.engine.create_task(title).await?;
        self.tasks.insert(0, task.clone());
        Ok(Some(task))
    }

    /// Flip the completion state of a displayed task.
    ///
    /// The list is updated before the engine call and rolled back if the
    /// call fails. Returns `None` when no task with `id` is displayed.
    pub async fn toggle_task(&mut self, id: i64) -> Result<Option<CompletionUpdate>> {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            debug!("Toggle ignored, task {id} is not displayed");
            return Ok(None);
        };

        let previous = self.tasks[index].completed;
        self.tasks[index].completed = !previous;

        match self.engine.set_completed(id, !previous).await {
            Ok(update) => {
                self.tasks[index].completed = update.completed;
                Ok(Some(update))
            }
            Err(e) => {
                self.tasks[index].completed = previous;
                Err(e)
            }
        }
    }

    /// Remove a task from the list and delete it through the engine.
    ///
    /// # Returns
    /// `true` if the remote service confirmed the deletion
    pub async fn delete_task(&mut self, id: i64) -> Result<bool> {
        self.tasks.retain(|task| task.id != id);
        self.engine.delete_task(id).await
    }

    /// Replay offline changes, reloading the list when anything was synced.
    pub async fn sync(&mut self) -> Result<SyncStatus> {
        let status = self.engine.sync_offline_tasks().await?;
        if status.synced_any() {
            self.refresh().await?;
        }
        Ok(status)
    }
}
