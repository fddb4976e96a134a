use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};

use super::KeyValueStore;
use crate::config::StorageConfig;
use crate::entities::kv_entry;

/// SQLite-backed key/value store
pub struct LocalStorage {
    pub conn: DatabaseConnection,
}

impl LocalStorage {
    /// Open the database described by the `[storage]` section
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        if config.in_memory {
            return Self::in_memory().await;
        }

        let path = config.resolve_database_path()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
            }
        }

        let database_url = format!("sqlite://{}?mode=rwc", path.display());
        Self::connect(&database_url, false).await
    }

    /// Open a private in-memory database
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", true).await
    }

    async fn connect(database_url: &str, in_memory: bool) -> Result<Self> {
        let mut options = ConnectOptions::new(database_url.to_owned());
        options.sqlx_logging(false);
        if in_memory {
            // The database lives as long as its single connection
            options.min_connections(1).max_connections(1);
        }

        let conn = Database::connect(options)
            .await
            .with_context(|| format!("Failed to open database: {database_url}"))?;

        let storage = LocalStorage { conn };
        storage.init_schema().await?;
        debug!("💾 Local storage ready at {database_url}");

        Ok(storage)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);
        let statement = schema
            .create_table_from_entity(kv_entry::Entity)
            .if_not_exists()
            .to_owned();

        self.conn
            .execute(backend.build(&statement))
            .await
            .context("Failed to create kv_entries table")?;

        Ok(())
    }

    /// Check if the database has any data
    pub async fn has_data(&self) -> Result<bool> {
        Ok(kv_entry::Entity::find().one(&self.conn).await?.is_some())
    }

    /// Clear all data from the database
    pub async fn clear_all_data(&self) -> Result<()> {
        kv_entry::Entity::delete_many().exec(&self.conn).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = kv_entry::Entity::find_by_id(key.to_owned())
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to read key '{key}'"))?;

        Ok(entry.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let entry = kv_entry::ActiveModel {
            key: ActiveValue::Set(key.to_owned()),
            value: ActiveValue::Set(value.to_owned()),
            updated_at: ActiveValue::Set(Utc::now()),
        };

        kv_entry::Entity::insert(entry)
            .on_conflict(
                OnConflict::column(kv_entry::Column::Key)
                    .update_columns([kv_entry::Column::Value, kv_entry::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .with_context(|| format!("Failed to write key '{key}'"))?;

        Ok(())
    }
}
