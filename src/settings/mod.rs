// (C) Coralbits SL 2025
// This file is part of Mapcache and is licensed under the
// GNU Affero General Public License v3.0.
// A commercial license on request is also available;
// contact info@coralbits.com for details.

mod db;
mod factory;
mod file;
mod inmem;
mod redis;
mod types;


pub use db::SqliteSettings;
pub use factory::open_settings;
pub use file::JsonFileSettings;
pub use inmem::InMemSettings;
pub use self::redis::RedisSettings;
pub use types::*;
