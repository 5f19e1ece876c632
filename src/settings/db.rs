// (C) Coralbits SL 2025
// This file is part of Mapcache and is licensed under the
// GNU Affero General Public License v3.0.
// A commercial license on request is also available;
// contact info@coralbits.com for details.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{sqlite::SqlitePool, Executor, Row};
use tracing::{debug, info};

use crate::settings::types::{SettingsError, SettingsStore};

/// Options table in a SQLite database, one row per option name.
pub struct SqliteSettings {
    db: SqlitePool,
}

impl SqliteSettings {
    pub async fn new(url: &str) -> Result<Self> {
        info!("Connecting to settings database at url={}", url);
        if url.starts_with("sqlite://") {
            let path = url.trim_start_matches("sqlite://");
            if !std::path::Path::new(path).exists() {
                debug!("Creating new SQLite database file at {}", path);
                std::fs::File::create(path)?;
            }
        }
        let db = SqlitePool::connect(url).await?;
        let ret = Self { db };

        ret.init().await?;

        Ok(ret)
    }

    async fn init(&self) -> Result<()> {
        let mut tx = self.db.begin().await?;
        tx.execute("CREATE TABLE IF NOT EXISTS options (name TEXT PRIMARY KEY, value TEXT NOT NULL)")
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for SqliteSettings {
    async fn get(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        let rec = sqlx::query(r#"SELECT value FROM options WHERE name = ?"#)
            .bind(key)
            .fetch_optional(&self.db)
            .await
            .map_err(SettingsError::backend)?;

        let Some(rec) = rec else {
            return Ok(None);
        };
        let data: String = rec.try_get("value").map_err(SettingsError::backend)?;
        let value = serde_json::from_str(&data).map_err(|e| SettingsError::Corrupt {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), SettingsError> {
        let data = serde_json::to_string(value).map_err(|e| SettingsError::Serialize {
            key: key.to_string(),
            source: e,
        })?;
        sqlx::query(r#"INSERT OR REPLACE INTO options (name, value) VALUES (?, ?)"#)
            .bind(key)
            .bind(data)
            .execute(&self.db)
            .await
            .map_err(SettingsError::backend)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, SettingsError> {
        let ret = sqlx::query(r#"DELETE FROM options WHERE name = ?"#)
            .bind(key)
            .execute(&self.db)
            .await
            .map_err(SettingsError::backend)?;
        Ok(ret.rows_affected() > 0)
    }
}
