use anyhow::Result;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::models::{CreateTaskArgs, Task, UpdateTaskArgs};
use crate::sync::ids::OfflineIdGenerator;
use crate::sync::{SyncEngine, SyncStatus};

/// Holds the single-flight flag for the duration of a replay.
///
/// Released on drop, so a replay cancelled at an await point does not leave
/// the flag set.
struct ReplayGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ReplayGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ReplayGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// A queued entry the remote service confirmed during a replay.
struct Confirmed {
    /// Entry as it was sent
    sent: Task,
    /// Id the remote service knows it by
    remote_id: i64,
}

impl SyncEngine {
    /// Replays every queued offline mutation against the remote service.
    ///
    /// Only one replay runs at a time: a call made while another is running
    /// returns [`SyncStatus::InProgress`] without doing anything. Connectivity
    /// is re-checked here rather than trusted from whoever triggered the call.
    ///
    /// Entries are sent one at a time in stored order. New entries are
    /// created remotely and adopt the remote id; others are patched with
    /// their title and completion. A failed entry stays queued and does not
    /// stop the rest.
    ///
    /// # Errors
    /// Only local storage failures are returned
    pub async fn sync_offline_tasks(&self) -> Result<SyncStatus> {
        let Some(_replay_guard) = ReplayGuard::acquire(&self.replay_in_progress) else {
            debug!("Replay already running, skipping");
            return Ok(SyncStatus::InProgress);
        };

        self.perform_replay().await
    }

    /// Internal replay implementation
    async fn perform_replay(&self) -> Result<SyncStatus> {
        if !self.connectivity.is_connected() {
            debug!("Not connected, replay skipped");
            return Ok(SyncStatus::Offline);
        }

        let Some(snapshot) = self.read_pending().await? else {
            return Ok(SyncStatus::Idle);
        };

        let queued: Vec<Task> = snapshot.into_iter().filter(Task::is_pending).collect();
        if queued.is_empty() {
            return Ok(SyncStatus::Completed { synced: 0, failed: 0 });
        }

        info!("🔄 Replaying {} offline tasks...", queued.len());

        let mut confirmed = Vec::with_capacity(queued.len());
        let mut failed = 0;

        for task in queued {
            let result = if task.is_new {
                let args = CreateTaskArgs {
                    title: task.title.clone(),
                    completed: task.completed,
                };
                self.remote.create(args).await.map(|created| created.id)
            } else {
                self.remote
                    .update_partial(task.id, UpdateTaskArgs::replay(&task))
                    .await
                    .map(|_| task.id)
            };

            match result {
                Ok(remote_id) => confirmed.push(Confirmed { sent: task, remote_id }),
                Err(e) => {
                    error!("❌ Failed to sync task {}: {e}", task.id);
                    failed += 1;
                }
            }
        }

        // Apply outcomes to the current list: it may have changed while the
        // remote calls were in flight.
        let _guard = self.pending_lock.lock().await;
        let mut tasks = self.read_pending().await?.unwrap_or_default();
        apply_confirmations(&mut tasks, &confirmed, &self.ids);
        self.write_pending(&tasks).await?;

        let synced = confirmed.len();
        info!("✅ Replay finished: {synced} synced, {failed} still pending");

        Ok(SyncStatus::Completed { synced, failed })
    }

    /// Runs [`sync_offline_tasks`](Self::sync_offline_tasks) on every
    /// transition into the connected state.
    ///
    /// The listener stops when the returned handle is unsubscribed or dropped.
    pub fn spawn_reconnect_listener(&self) -> ReconnectListener {
        let engine = self.clone();
        let mut connectivity = self.connectivity.subscribe();
        let (status_tx, status_rx) = watch::channel(SyncStatus::Idle);

        let handle = tokio::spawn(async move {
            while connectivity.changed().await.is_ok() {
                let connected = *connectivity.borrow_and_update();
                if !connected {
                    continue;
                }

                match engine.sync_offline_tasks().await {
                    Ok(status) => {
                        status_tx.send_replace(status);
                    }
                    Err(e) => error!("❌ Replay after reconnect failed: {e:#}"),
                }
            }
        });

        ReconnectListener {
            handle,
            status: status_rx,
        }
    }
}

/// Folds replay outcomes into the current list.
///
/// Each outcome is matched to its entry before any id is rewritten, so an id
/// adopted by one entry cannot redirect another outcome. Once applied, an id
/// claimed by a remote create belongs to that entry alone: other holders are
/// stale copies and are dropped, unless they still carry unsent changes, in
/// which case they are queued for creation under a fresh offline id.
fn apply_confirmations(tasks: &mut Vec<Task>, confirmed: &[Confirmed], ids: &OfflineIdGenerator) {
    let targets: Vec<Option<usize>> = confirmed
        .iter()
        .map(|outcome| tasks.iter().position(|task| task.id == outcome.sent.id))
        .collect();

    let mut claims = Vec::new();
    for (outcome, target) in confirmed.iter().zip(&targets) {
        let sent = &outcome.sent;
        let Some(index) = *target else {
            debug!("Task {} was removed locally during replay", sent.id);
            continue;
        };

        let entry = &mut tasks[index];
        entry.id = outcome.remote_id;
        if entry.title == sent.title && entry.completed == sent.completed {
            entry.mark_synced();
        } else {
            // Changed locally mid-flight: it exists remotely now, but the newer
            // values still need to be sent.
            entry.is_new = false;
        }

        if sent.is_new {
            claims.push(index);
        }
    }

    let mut stale = vec![false; tasks.len()];
    for &owner in &claims {
        let remote_id = tasks[owner].id;
        for other in 0..tasks.len() {
            if other == owner || stale[other] || tasks[other].id != remote_id {
                continue;
            }

            if tasks[other].is_pending() || claims.contains(&other) {
                let fresh_id = ids.next_id();
                warn!(
                    "⚠️  Remote id {remote_id} is already used locally, requeueing task as {fresh_id}"
                );
                let task = &mut tasks[other];
                task.id = fresh_id;
                task.offline = true;
                task.is_new = true;
            } else {
                warn!("⚠️  Remote id {remote_id} is already used locally, dropping stale copy");
                stale[other] = true;
            }
        }
    }

    let mut index = 0;
    tasks.retain(|_| {
        let keep = !stale[index];
        index += 1;
        keep
    });
}

/// Handle to a running reconnect listener.
///
/// Dropping the handle stops the listener.
pub struct ReconnectListener {
    handle: JoinHandle<()>,
    status: watch::Receiver<SyncStatus>,
}

impl ReconnectListener {
    /// Receiver updated with the outcome of each replay the listener ran.
    pub fn status(&self) -> watch::Receiver<SyncStatus> {
        self.status.clone()
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop listening for connectivity changes.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for ReconnectListener {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
