// (C) Coralbits SL 2025
// This file is part of Mapcache and is licensed under the
// GNU Affero General Public License v3.0.
// A commercial license on request is also available;
// contact info@coralbits.com for details.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::geocode::{
    client::GeocodingClient,
    types::{AddressCoordinateCache, GeocodeError, GeocodeRequest, GeocodeResult},
};
use crate::settings::{SettingsError, SettingsStore};

pub const DEFAULT_OPTION_KEY: &str = "wplook_map_coordinates";

/// Resolves addresses through the coordinate map kept in the settings store,
/// asking the geocoding client only for addresses it has never seen.
///
/// The map is read and written whole with no locking. Two concurrent misses
/// for the same address both reach the service and the last write wins; a
/// miss racing with a miss for another address can drop that other entry,
/// which is then fetched again on its next lookup.
pub struct GeocodeResolver {
    settings: Arc<dyn SettingsStore>,
    client: Arc<dyn GeocodingClient>,
    option_key: String,
}

impl std::fmt::Debug for GeocodeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GeocodeResolver({})", self.option_key)
    }
}

impl GeocodeResolver {
    pub fn new(settings: Arc<dyn SettingsStore>, client: Arc<dyn GeocodingClient>) -> Self {
        Self {
            settings,
            client,
            option_key: DEFAULT_OPTION_KEY.to_string(),
        }
    }

    pub fn with_option_key(mut self, option_key: &str) -> Self {
        self.option_key = option_key.to_string();
        self
    }

    pub fn option_key(&self) -> &str {
        &self.option_key
    }

    /// Current coordinate map. A missing option reads as an empty map.
    pub async fn load_cache(&self) -> Result<AddressCoordinateCache, GeocodeError> {
        let value = self.settings.get(&self.option_key).await?;
        match value {
            None | Some(Value::Null) => Ok(AddressCoordinateCache::new()),
            Some(value) => serde_json::from_value(value).map_err(|e| {
                GeocodeError::Settings(SettingsError::Corrupt {
                    key: self.option_key.clone(),
                    message: e.to_string(),
                })
            }),
        }
    }

    async fn store_cache(&self, cache: &AddressCoordinateCache) -> Result<(), GeocodeError> {
        let value = serde_json::to_value(cache).map_err(|e| SettingsError::Serialize {
            key: self.option_key.clone(),
            source: e,
        })?;
        self.settings.set(&self.option_key, &value).await?;
        Ok(())
    }

    #[instrument(skip(self, api_key))]
    pub async fn resolve(&self, address: &str, api_key: &str) -> GeocodeResult {
        let mut cache = self.load_cache().await?;

        if let Some(coordinates) = cache.get(address) {
            debug!("Cache hit for address={}", address);
            return Ok(*coordinates);
        }
        debug!("Cache miss for address={}", address);

        let request = GeocodeRequest { address, api_key };
        let coordinates = self.client.geocode(&request).await?;

        cache.insert(address.to_string(), coordinates);
        self.store_cache(&cache).await?;
        info!(
            "Stored coordinates for address={} cache_size={}",
            address,
            cache.len()
        );

        Ok(coordinates)
    }

    /// Drops the whole coordinate map. Returns true if there was one.
    pub async fn forget_all(&self) -> Result<bool, GeocodeError> {
        let ret = self.settings.delete(&self.option_key).await?;
        info!("Cleared coordinate cache option={} existed={}", self.option_key, ret);
        Ok(ret)
    }
}
