// (C) Coralbits SL 2025
// This file is part of Mapcache and is licensed under the
// GNU Affero General Public License v3.0.
// A commercial license on request is also available;
// contact info@coralbits.com for details.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::SettingsError;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Every address ever resolved, keyed by the exact string the caller used.
pub type AddressCoordinateCache = BTreeMap<String, Coordinates>;

/// One lookup against the remote geocoding service.
#[derive(Debug, Clone, Copy)]
pub struct GeocodeRequest<'a> {
    pub address: &'a str,
    pub api_key: &'a str,
}

pub type GeocodeResult = Result<Coordinates, GeocodeError>;

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("{message}")]
    Transport { message: String },
    #[error("{message}")]
    Service { status: String, message: String },
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl GeocodeError {
    pub fn transport(address: &str) -> Self {
        GeocodeError::Transport {
            message: format!(
                "Could not get the coordinates for \"{}\" from the geocoding service. Please try again.",
                address
            ),
        }
    }

    pub fn service(address: &str, status: &str, message: Option<String>) -> Self {
        let message = message.filter(|m| !m.is_empty()).unwrap_or_else(|| {
            format!(
                "Something went wrong when getting the coordinates for \"{}\" from the Google Maps Geocoding API. Please try again.",
                address
            )
        });
        GeocodeError::Service {
            status: status.to_string(),
            message,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            GeocodeError::Transport { .. } => "TRANSPORT_ERROR",
            GeocodeError::Service { .. } => "SERVICE_ERROR",
            GeocodeError::Settings(e) => e.error_code(),
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            GeocodeError::Transport { .. } => 502,
            GeocodeError::Service { .. } => 502,
            GeocodeError::Settings(_) => 500,
        }
    }
}
