//! Constants used throughout the application
//!
//! This module centralizes magic strings, storage keys, log text, and other
//! constant values to improve maintainability and consistency.

// Storage
/// Key under which the pending list is persisted in the local store
pub const TASKS_STORAGE_KEY: &str = "offline_tasks";
/// File name of the SQLite database inside the data directory
pub const DATABASE_FILE_NAME: &str = "tasks.db";
/// Application directory name used under the platform config/data dirs
pub const APP_DIR_NAME: &str = "tasklist";
/// Configuration file looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = "tasklist.toml";
/// Log file name inside the data directory
pub const LOG_FILE_NAME: &str = "tasklist.log";
/// Entries kept in the in-memory log history
pub const MAX_LOG_HISTORY: usize = 1000;

// Remote API defaults
pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com/todos";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LIST_LIMIT: u32 = 5;
pub const MAX_LIST_LIMIT: u32 = 200;
pub const MAX_TIMEOUT_SECS: u64 = 300;

// Connectivity
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 15;
pub const MAX_PROBE_INTERVAL_SECS: u64 = 3600;
/// Upper bound for a single reachability probe
pub const PROBE_TIMEOUT_MS: u64 = 3000;

// Success Messages
pub const SUCCESS_TASK_CREATED: &str = "✅ Task created";
pub const SUCCESS_TASK_COMPLETED: &str = "✅ Task completed";
pub const SUCCESS_TASK_REOPENED: &str = "✅ Task reopened";
pub const SUCCESS_TASK_DELETED: &str = "✅ Task deleted";

// Offline Messages
pub const OFFLINE_TASK_SAVED: &str = "📴 Saved locally, will sync when back online";
pub const OFFLINE_TASK_REMOVED: &str = "📴 Removed locally, the server was not reached";

// UI Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";
pub const EMPTY_TASK_LIST: &str = "No tasks yet.";
