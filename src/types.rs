// (C) Coralbits SL 2025
// This file is part of Mapcache and is licensed under the
// GNU Affero General Public License v3.0.
// A commercial license on request is also available;
// contact info@coralbits.com for details.

use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::geocode::{Coordinates, GeocodeError};

#[derive(Object, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CoordinatesJson {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinates> for CoordinatesJson {
    fn from(coordinates: Coordinates) -> Self {
        Self {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        }
    }
}

#[derive(Object, Serialize, Deserialize, Debug, Clone)]
pub struct CacheInfo {
    pub option_key: String,
    pub count: u64,
}

#[derive(Object, Serialize, Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    pub details: String,
    pub code: String,
    pub status: u16,
    #[oai(skip_serializing_if_is_none)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_status: Option<String>,
}

impl ErrorResponse {
    pub fn new(details: String, code: &str, status: u16) -> Self {
        Self {
            details,
            code: code.to_string(),
            status,
            service_status: None,
        }
    }

    pub fn from_geocode_error(error: &GeocodeError) -> Self {
        let mut ret = Self::new(error.to_string(), error.error_code(), error.http_status());
        if let GeocodeError::Service { status, .. } = error {
            ret.service_status = Some(status.clone());
        }
        ret
    }
}
