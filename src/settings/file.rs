use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::settings::types::{SettingsError, SettingsStore};

/// Keeps every option in a single JSON object on disk. Each write rewrites
/// the whole document through a temporary file and an atomic rename.
pub struct JsonFileSettings {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileSettings {
    pub fn new(path: &str) -> Self {
        info!("Using settings file path={}", path);
        Self {
            path: Path::new(path).to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_document(&self) -> Result<Map<String, Value>, SettingsError> {
        if !self.path.exists() {
            debug!("Settings file not found, path={}", self.path.display());
            return Ok(Map::new());
        }
        let data = fs::read_to_string(&self.path).map_err(SettingsError::backend)?;
        if data.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&data) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(SettingsError::Corrupt {
                key: self.path.display().to_string(),
                message: "settings file is not a JSON object".to_string(),
            }),
            Err(e) => Err(SettingsError::Corrupt {
                key: self.path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), SettingsError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let data = serde_json::to_vec_pretty(document).map_err(|e| SettingsError::Serialize {
            key: self.path.display().to_string(),
            source: e,
        })?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(SettingsError::backend)?;
        tmp.write_all(&data).map_err(SettingsError::backend)?;
        tmp.persist(&self.path).map_err(SettingsError::backend)?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettings {
    async fn get(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        let document = self.read_document()?;
        Ok(document.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), SettingsError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document()?;
        document.insert(key.to_string(), value.clone());
        self.write_document(&document)
    }

    async fn delete(&self, key: &str) -> Result<bool, SettingsError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document()?;
        if document.remove(key).is_none() {
            return Ok(false);
        }
        self.write_document(&document)?;
        Ok(true)
    }
}
