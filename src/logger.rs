use anyhow::{Context, Result};
use chrono::Utc;
use log::LevelFilter;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::{Config, LoggingConfig};
use crate::constants::{LOG_FILE_NAME, MAX_LOG_HISTORY};

/// Shared logger that can be used across the application
///
/// Every record that passes the level filter is kept in memory (for a debug
/// view) and, when file logging is enabled, appended to the log file. The
/// in-memory history holds the latest [`MAX_LOG_HISTORY`] entries.
#[derive(Clone)]
pub struct Logger {
    logs: Arc<Mutex<VecDeque<String>>>,
    level: LevelFilter,
    file_path: Option<PathBuf>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(VecDeque::new())),
            level: LevelFilter::Info,
            file_path: None,
        }
    }

    /// Build a logger from the `[logging]` section
    pub fn from_config(config: &LoggingConfig) -> Result<Self> {
        let level = config.level_filter()?;
        let file_path = if config.enabled {
            Some(Self::get_log_file_path()?)
        } else {
            None
        };

        Ok(Self {
            logs: Arc::new(Mutex::new(VecDeque::new())),
            level,
            file_path,
        })
    }

    /// Logger writing to an explicit file
    pub fn with_file<P: AsRef<Path>>(level: LevelFilter, path: P) -> Self {
        Self {
            logs: Arc::new(Mutex::new(VecDeque::new())),
            level,
            file_path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Whether records are also written to a file
    pub fn is_enabled(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Add a log entry
    pub fn log(&self, message: String) {
        let timestamp = Utc::now().format("%H:%M:%S%.3f").to_string();
        let formatted_message = format!("[{}] {}", timestamp, message);

        push_bounded(&self.logs, formatted_message);
    }

    /// Get all logs sorted by date (newest first)
    pub fn get_logs(&self) -> Vec<String> {
        match self.logs.lock() {
            Ok(logs) => logs.iter().rev().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Clear all logs
    pub fn clear(&self) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.clear();
        }
    }

    /// Build the `fern` dispatch feeding the in-memory history and the log file
    pub fn dispatch(&self) -> Result<fern::Dispatch> {
        let logs = Arc::clone(&self.logs);

        let mut dispatch = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{}] {} {}: {}",
                    Utc::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .level(self.level)
            // HTTP and SQL internals are noisy below warn
            .level_for("sqlx", LevelFilter::Warn)
            .level_for("sea_orm", LevelFilter::Warn)
            .level_for("hyper_util", LevelFilter::Warn)
            .level_for("reqwest", LevelFilter::Warn)
            .chain(fern::Output::call(move |record| {
                push_bounded(&logs, record.args().to_string());
            }));

        if let Some(path) = &self.file_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
            }
            let file =
                fern::log_file(path).with_context(|| format!("Failed to open log file: {}", path.display()))?;
            dispatch = dispatch.chain(file);
        }

        Ok(dispatch)
    }

    /// Install this logger as the global `log` backend
    pub fn install(&self) -> Result<()> {
        self.dispatch()?.apply().context("Failed to install logger")
    }

    /// Location of the log file when file logging is enabled
    pub fn get_log_file_path() -> Result<PathBuf> {
        Ok(Config::get_data_dir()?.join(LOG_FILE_NAME))
    }
}

fn push_bounded(logs: &Mutex<VecDeque<String>>, entry: String) {
    if let Ok(mut logs) = logs.lock() {
        if logs.len() >= MAX_LOG_HISTORY {
            logs.pop_front();
        }
        logs.push_back(entry);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
