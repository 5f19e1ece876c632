// (C) Coralbits SL 2025
// This file is part of Mapcache and is licensed under the
// GNU Affero General Public License v3.0.
// A commercial license on request is also available;
// contact info@coralbits.com for details.

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands};
use serde_json::Value;
use tracing::{debug, error};

use crate::settings::types::{SettingsError, SettingsStore};

/// Stores each option as a redis string holding its JSON encoding.
pub struct RedisSettings {
    client: redis::Client,
}

impl RedisSettings {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        debug!("Creating redis settings store with url: {}", url);
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, SettingsError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                error!("Failed to get redis client: {}", e);
                SettingsError::backend(e)
            })
    }
}

#[async_trait]
impl SettingsStore for RedisSettings {
    async fn get(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        let mut client = self.connection().await?;
        let data: Option<String> = client.get(key).await.map_err(SettingsError::backend)?;
        match data {
            Some(data) => {
                let value = serde_json::from_str(&data).map_err(|e| SettingsError::Corrupt {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), SettingsError> {
        let data = serde_json::to_string(value).map_err(|e| SettingsError::Serialize {
            key: key.to_string(),
            source: e,
        })?;
        let mut client = self.connection().await?;
        client
            .set::<&str, String, ()>(key, data)
            .await
            .map_err(|e| {
                error!("Failed to set redis key: {}", e);
                SettingsError::backend(e)
            })
    }

    async fn delete(&self, key: &str) -> Result<bool, SettingsError> {
        let mut client = self.connection().await?;
        let removed: i64 = client.del(key).await.map_err(|e| {
            error!("Failed to delete redis key: {}", e);
            SettingsError::backend(e)
        })?;
        Ok(removed > 0)
    }
}
