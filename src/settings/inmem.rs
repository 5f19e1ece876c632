// (C) Coralbits SL 2025
// This file is part of Mapcache and is licensed under the
// GNU Affero General Public License v3.0.
// A commercial license on request is also available;
// contact info@coralbits.com for details.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::settings::types::{SettingsError, SettingsStore};

pub struct InMemSettings {
    options: RwLock<HashMap<String, Value>>,
}

impl InMemSettings {
    pub fn new() -> Self {
        Self {
            options: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for InMemSettings {
    async fn get(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        Ok(self.options.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), SettingsError> {
        self.options
            .write()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, SettingsError> {
        Ok(self.options.write().await.remove(key).is_some())
    }
}
