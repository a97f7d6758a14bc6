//! Configuration collaborators
//!
//! The factory reads configuration through the narrow [`ConfigSource`]
//! trait; [`EnvConfig`] is the environment-backed implementation used by
//! CLI consumers.

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Names of the settings recognized by [`EnvConfig`]. Errors cite these
/// keys so callers can report actionable messages.
pub mod keys {
    /// Base directory for locally stored data.
    pub const HOME: &str = "CELLAR_HOME";
    /// Driver identifier selecting the storage backend.
    pub const DB_DRIVER: &str = "CELLAR_DB_DRIVER";
    /// Connection URL handed to the backend.
    pub const DB_URL: &str = "CELLAR_DB_URL";
    /// Update source for the local data set.
    pub const DB_UPDATE: &str = "CELLAR_DB_UPDATE";
}

/// Read-only view of the runtime configuration.
///
/// Accessors return `None` when a setting was not supplied; defaults are
/// applied by the factory, which knows the driver registry.
pub trait ConfigSource {
    /// Configured driver identifier, if any.
    fn db_driver(&self) -> Option<String>;

    /// Configured connection URL, if any.
    fn db_url(&self) -> Option<String>;

    /// Base directory for locally stored data. Fails when the location
    /// cannot be determined or created.
    fn home(&self) -> io::Result<PathBuf>;

    /// Configured update source, if any.
    fn db_update(&self) -> Option<String>;
}

/// Configuration read from environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig;

impl EnvConfig {
    pub fn new() -> Self {
        Self
    }

    fn var(key: &str) -> Option<String> {
        env::var(key).ok().filter(|value| !value.is_empty())
    }
}

impl ConfigSource for EnvConfig {
    fn db_driver(&self) -> Option<String> {
        Self::var(keys::DB_DRIVER)
    }

    fn db_url(&self) -> Option<String> {
        Self::var(keys::DB_URL)
    }

    /// Home is `CELLAR_HOME` when set, otherwise a `cellar` directory
    /// under the platform's local data directory. The directory is created
    /// on access.
    fn home(&self) -> io::Result<PathBuf> {
        let path = match Self::var(keys::HOME) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_local_dir()
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        "could not find local data directory",
                    )
                })?
                .join("cellar"),
        };
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    fn db_update(&self) -> Option<String> {
        Self::var(keys::DB_UPDATE)
    }
}
