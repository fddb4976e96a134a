//! Task data model shared by the remote client, the local store, and the
//! sync engine.

use serde::{Deserialize, Serialize};

/// A single task as seen by the application.
///
/// The same shape is used for remote payloads and for entries of the pending
/// list, so the bookkeeping flags default to `false` when absent and are left
/// out of the JSON when they are `false`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    /// A mutation on this task has not been confirmed by the remote service.
    #[serde(default, skip_serializing_if = "is_false")]
    pub offline: bool,
    /// Created while offline and never created remotely. Implies `offline`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_new: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Task {
    /// A task created locally while the remote service could not be reached.
    pub fn new_offline(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
            offline: true,
            is_new: true,
        }
    }

    /// Whether this entry still has replay work pending.
    pub fn is_pending(&self) -> bool {
        self.offline
    }

    /// Clears the bookkeeping flags once the remote service confirmed the entry.
    pub fn mark_synced(&mut self) {
        self.offline = false;
        self.is_new = false;
    }
}

/// Arguments for creating a task remotely.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateTaskArgs {
    pub title: String,
    pub completed: bool,
}

/// Arguments for a partial update; `None` fields are not sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UpdateTaskArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTaskArgs {
    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }

    /// Full replay payload for an entry that already exists remotely.
    pub fn replay(task: &Task) -> Self {
        Self {
            title: Some(task.title.clone()),
            completed: Some(task.completed),
        }
    }
}

/// Result of a completion toggle: the remote echo or the local best effort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionUpdate {
    pub id: i64,
    pub completed: bool,
}
