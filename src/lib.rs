// (C) Coralbits SL 2025
// This file is part of Mapcache and is licensed under the
// GNU Affero General Public License v3.0.
// A commercial license on request is also available;
// contact info@coralbits.com for details.

pub mod config;
pub mod geocode;
pub mod map;
pub mod server;
pub mod settings;
pub mod types;
pub mod utils;

pub use config::*;
pub use geocode::*;
pub use map::*;
pub use settings::*;
pub use types::*;
