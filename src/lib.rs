//! Cellar
//!
//! Resolves runtime configuration into a validated database connection and
//! hands back a ready-to-use storage backend. Meant for command-line tools
//! that need a local database without hard-coding where it lives.

pub mod config;
pub mod db;

pub use config::{keys, ConfigSource, EnvConfig};
pub use db::error::{DbError, Result};
pub use db::factory::DbFactory;
pub use db::registry::DriverRegistry;
pub use db::storage::{ResolvedConnection, Storage, StorageInfo};
