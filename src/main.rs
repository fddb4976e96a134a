//! tasklist CLI
//!
//! Command-line front end for the offline-first task list.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use tasklist::config::Config;
use tasklist::connectivity::{ConnectivityMonitor, NetworkProbe};
use tasklist::constants::{
    EMPTY_TASK_LIST, OFFLINE_TASK_REMOVED, OFFLINE_TASK_SAVED, SUCCESS_TASK_COMPLETED, SUCCESS_TASK_CREATED,
    SUCCESS_TASK_DELETED, SUCCESS_TASK_REOPENED,
};
use tasklist::controller::TaskListController;
use tasklist::logger::Logger;
use tasklist::models::Task;
use tasklist::remote::RestTaskService;
use tasklist::storage::LocalStorage;
use tasklist::sync::{SyncEngine, SyncStatus};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "Offline-first task list")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Use this configuration file instead of the default lookup
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Task(TaskCommand),
    /// Write a default configuration file
    InitConfig {
        /// Destination (defaults to the user config directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Commands that work on the task list
#[derive(Subcommand)]
enum TaskCommand {
    /// Show the task list
    List {
        /// Number of tasks to request from the server
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Add a task
    Add {
        /// Task title
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Mark a task as completed
    Done { id: i64 },
    /// Mark a task as not completed
    Undo { id: i64 },
    /// Delete a task
    Remove { id: i64 },
    /// Send changes made while offline
    Sync,
    /// Watch connectivity and send offline changes whenever it comes back
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::InitConfig { path } => {
            let path = match path {
                Some(path) => path,
                None => Config::get_default_config_path()?,
            };
            Config::generate_default_config(path)
        }
        Commands::Task(command) => run(command, cli.config, cli.json).await,
    }
}

async fn run(command: TaskCommand, config_path: Option<PathBuf>, json: bool) -> Result<()> {
    let config = match &config_path {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };

    Logger::from_config(&config.logging)?.install()?;

    let storage = Arc::new(LocalStorage::new(&config.storage).await?);
    let remote = Arc::new(RestTaskService::new(&config.api)?);
    let probe = NetworkProbe::for_url(remote.base_url())?;

    let connectivity = Arc::new(ConnectivityMonitor::new(false));
    probe.refresh(&connectivity).await;

    let engine = SyncEngine::new(remote, storage, Arc::clone(&connectivity));
    let mut controller = TaskListController::new(engine, config.api.list_limit);

    match command {
        TaskCommand::List { limit } => {
            let tasks = match limit {
                Some(limit) => controller.engine().load_tasks(limit).await?,
                None => controller.refresh().await?.to_vec(),
            };
            print_tasks(&tasks, json)?;
        }
        TaskCommand::Add { title } => {
            match controller.add_task(&title.join(" ")).await? {
                Some(task) if json => println!("{}", serde_json::to_string_pretty(&task)?),
                Some(task) if task.offline => println!("{} ({})", OFFLINE_TASK_SAVED, task.id),
                Some(task) => println!("{} ({})", SUCCESS_TASK_CREATED, task.id),
                None => anyhow::bail!("Task title cannot be empty"),
            }
        }
        TaskCommand::Done { id } => set_completed(&controller, id, true).await?,
        TaskCommand::Undo { id } => set_completed(&controller, id, false).await?,
        TaskCommand::Remove { id } => {
            if controller.delete_task(id).await? {
                println!("{SUCCESS_TASK_DELETED}");
            } else {
                println!("{OFFLINE_TASK_REMOVED}");
            }
        }
        TaskCommand::Sync => {
            let status = controller.sync().await?;
            println!("{}", describe_status(&status));
        }
        TaskCommand::Watch => {
            if !config.sync.replay_on_reconnect {
                anyhow::bail!("sync.replay_on_reconnect is disabled in the configuration");
            }
            watch(&controller, probe, connectivity, &config).await?;
        }
    }

    Ok(())
}

async fn set_completed(controller: &TaskListController, id: i64, completed: bool) -> Result<()> {
    let update = controller.engine().set_completed(id, completed).await?;
    if update.completed {
        println!("{SUCCESS_TASK_COMPLETED}");
    } else {
        println!("{SUCCESS_TASK_REOPENED}");
    }
    Ok(())
}

async fn watch(
    controller: &TaskListController,
    probe: NetworkProbe,
    connectivity: Arc<ConnectivityMonitor>,
    config: &Config,
) -> Result<()> {
    let engine = controller.engine();
    let listener = engine.spawn_reconnect_listener();
    let mut status = listener.status();

    // Queued changes from an earlier session go out right away when online
    if connectivity.is_connected() {
        println!("{}", describe_status(&engine.sync_offline_tasks().await?));
    }

    println!("👀 Watching {} (Ctrl-C to stop)", probe.address());
    let poller = probe.spawn(connectivity, config.sync.probe_interval());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = status.borrow_and_update().clone();
                println!("{}", describe_status(&latest));
            }
        }
    }

    poller.abort();
    listener.unsubscribe();
    Ok(())
}

fn print_tasks(tasks: &[Task], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("{EMPTY_TASK_LIST}");
        return Ok(());
    }

    for task in tasks {
        let check = if task.completed { "x" } else { " " };
        let marker = if task.offline { "  📴" } else { "" };
        println!("[{check}] {:>14}  {}{marker}", task.id, task.title);
    }
    Ok(())
}

fn describe_status(status: &SyncStatus) -> String {
    match status {
        SyncStatus::Idle => "Nothing stored locally yet".to_string(),
        SyncStatus::Offline => "📴 Offline, changes stay queued".to_string(),
        SyncStatus::InProgress => "🔄 A sync is already running".to_string(),
        SyncStatus::Completed { synced: 0, failed: 0 } => "✅ Nothing to sync".to_string(),
        SyncStatus::Completed { synced, failed: 0 } => format!("✅ Synced {synced} tasks"),
        SyncStatus::Completed { synced, failed } => {
            format!("⚠️  Synced {synced} tasks, {failed} still pending")
        }
    }
}
