#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use tasklist::connectivity::ConnectivityMonitor;
use tasklist::constants::TASKS_STORAGE_KEY;
use tasklist::models::{CreateTaskArgs, Task, UpdateTaskArgs};
use tasklist::remote::{RemoteError, TaskService};
use tasklist::storage::{KeyValueStore, MemoryStore};
use tasklist::sync::SyncEngine;

/// Remote call observed by [`FakeTaskService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(u32),
    Create(String),
    Update(i64),
    Delete(i64),
}

struct FakeState {
    online: bool,
    tasks: Vec<Task>,
    next_id: i64,
    failing_ids: HashSet<i64>,
    failing_titles: HashSet<String>,
    create_gate: Option<Arc<Notify>>,
    calls: Vec<Call>,
}

/// Scripted in-memory stand-in for the remote task service
pub struct FakeTaskService {
    state: Mutex<FakeState>,
}

impl FakeTaskService {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                online: true,
                tasks: Vec::new(),
                next_id: 201,
                failing_ids: HashSet::new(),
                failing_titles: HashSet::new(),
                create_gate: None,
                calls: Vec::new(),
            }),
        }
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let service = Self::new();
        service.state.lock().unwrap().tasks = tasks;
        service
    }

    pub fn set_online(&self, online: bool) {
        self.state.lock().unwrap().online = online;
    }

    pub fn set_next_id(&self, id: i64) {
        self.state.lock().unwrap().next_id = id;
    }

    /// Updates and deletes of `id` fail
    pub fn fail_id(&self, id: i64) {
        self.state.lock().unwrap().failing_ids.insert(id);
    }

    /// Creates with this title fail
    pub fn fail_title(&self, title: &str) {
        self.state.lock().unwrap().failing_titles.insert(title.to_string());
    }

    /// Creates wait for a permit on the returned gate before answering
    pub fn hold_creates(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().unwrap().create_gate = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn remote_tasks(&self) -> Vec<Task> {
        self.state.lock().unwrap().tasks.clone()
    }

    fn record(&self, call: Call) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.online {
            Ok(())
        } else {
            Err(RemoteError::Network("connection refused".to_string()))
        }
    }
}

#[async_trait]
impl TaskService for FakeTaskService {
    async fn list(&self, limit: u32) -> Result<Vec<Task>, RemoteError> {
        self.record(Call::List(limit))?;
        let state = self.state.lock().unwrap();
        Ok(state.tasks.iter().take(limit as usize).cloned().collect())
    }

    async fn create(&self, args: CreateTaskArgs) -> Result<Task, RemoteError> {
        self.record(Call::Create(args.title.clone()))?;

        let gate = self.state.lock().unwrap().create_gate.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut state = self.state.lock().unwrap();
        if state.failing_titles.contains(&args.title) {
            return Err(RemoteError::Status { status: 500 });
        }

        let task = Task {
            id: state.next_id,
            title: args.title,
            completed: args.completed,
            offline: false,
            is_new: false,
        };
        state.next_id += 1;
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_partial(&self, id: i64, args: UpdateTaskArgs) -> Result<Task, RemoteError> {
        self.record(Call::Update(id))?;

        let mut state = self.state.lock().unwrap();
        if state.failing_ids.contains(&id) {
            return Err(RemoteError::Status { status: 500 });
        }

        match state.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                if let Some(title) = args.title {
                    task.title = title;
                }
                if let Some(completed) = args.completed {
                    task.completed = completed;
                }
                Ok(task.clone())
            }
            None => Ok(Task {
                id,
                title: args.title.unwrap_or_default(),
                completed: args.completed.unwrap_or_default(),
                offline: false,
                is_new: false,
            }),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RemoteError> {
        self.record(Call::Delete(id))?;

        let mut state = self.state.lock().unwrap();
        if state.failing_ids.contains(&id) {
            return Err(RemoteError::Status { status: 404 });
        }
        state.tasks.retain(|task| task.id != id);
        Ok(())
    }
}

/// Engine wired to fakes, with handles to every collaborator
pub struct Harness {
    pub engine: SyncEngine,
    pub remote: Arc<FakeTaskService>,
    pub store: Arc<MemoryStore>,
    pub connectivity: Arc<ConnectivityMonitor>,
}

impl Harness {
    pub fn new(remote: FakeTaskService) -> Self {
        let remote = Arc::new(remote);
        let store = Arc::new(MemoryStore::new());
        let connectivity = Arc::new(ConnectivityMonitor::new(true));
        let engine = SyncEngine::new(remote.clone(), store.clone(), connectivity.clone());

        Self {
            engine,
            remote,
            store,
            connectivity,
        }
    }

    pub async fn seed(&self, tasks: &[Task]) {
        let raw = serde_json::to_string(tasks).unwrap();
        self.store.set(TASKS_STORAGE_KEY, &raw).await.unwrap();
    }

    pub async fn stored(&self) -> Option<Vec<Task>> {
        self.store
            .get(TASKS_STORAGE_KEY)
            .await
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    pub async fn stored_raw(&self) -> Option<String> {
        self.store.get(TASKS_STORAGE_KEY).await.unwrap()
    }
}

pub fn task(id: i64, title: &str, completed: bool) -> Task {
    Task {
        id,
        title: title.to_string(),
        completed,
        offline: false,
        is_new: false,
    }
}

pub fn queued(id: i64, title: &str, completed: bool, is_new: bool) -> Task {
    Task {
        id,
        title: title.to_string(),
        completed,
        offline: true,
        is_new,
    }
}
