use std::sync::Arc;

use tracing::info;

use crate::config::SettingsConfig;
use crate::settings::{
    db::SqliteSettings, file::JsonFileSettings, inmem::InMemSettings, redis::RedisSettings,
    types::SettingsStore,
};

/// Opens the settings backend named in the configuration.
pub async fn open_settings(config: &SettingsConfig) -> anyhow::Result<Arc<dyn SettingsStore>> {
    info!(
        "Opening settings store backend={} url={}",
        config.backend, config.url
    );
    let store: Arc<dyn SettingsStore> = match config.backend.as_str() {
        "inmem" => Arc::new(InMemSettings::new()),
        "file" => Arc::new(JsonFileSettings::new(&config.url)),
        "sqlite" => Arc::new(SqliteSettings::new(&config.url).await?),
        "redis" => Arc::new(RedisSettings::new(&config.url)?),
        _ => return Err(anyhow::anyhow!("Invalid settings backend: {}", config.backend)),
    };
    Ok(store)
}
