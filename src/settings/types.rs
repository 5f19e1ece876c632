use std::fmt::Display;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// A key-value option store. Values are arbitrary JSON documents, one per key.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, SettingsError>;
    async fn set(&self, key: &str, value: &Value) -> Result<(), SettingsError>;
    /// Returns true when something was deleted.
    async fn delete(&self, key: &str) -> Result<bool, SettingsError>;
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings backend error: {message}")]
    Backend { message: String },
    #[error("Could not serialize option {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Option {key} holds unexpected data: {message}")]
    Corrupt { key: String, message: String },
}

impl SettingsError {
    pub fn backend(err: impl Display) -> Self {
        SettingsError::Backend {
            message: err.to_string(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SettingsError::Backend { .. } => "SETTINGS_BACKEND",
            SettingsError::Serialize { .. } => "SETTINGS_SERIALIZE",
            SettingsError::Corrupt { .. } => "SETTINGS_CORRUPT",
        }
    }
}
