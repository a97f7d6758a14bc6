//! Connection resolution
//!
//! Turns configuration into a validated driver/url pair and constructs the
//! storage backend behind it.

use std::env;
use std::path::PathBuf;

use tracing::debug;

use crate::config::{keys, ConfigSource, EnvConfig};

use super::drivers::sqlite::SqliteStorage;
use super::error::{DbError, Result};
use super::registry::{DriverRegistry, DEFAULT_DRIVER};
use super::storage::{ResolvedConnection, Storage};

/// Subdirectory of the configuration home where database files live.
const DATA_DIR: &str = "data";

/// Update source assumed when none is configured.
const DEFAULT_UPDATE: &str = "auto";

/// Factory producing storage backends from configuration.
///
/// Owns the process's driver registry; share the factory (or the registry
/// handle it exposes) instead of creating several registries.
pub struct DbFactory<C: ConfigSource = EnvConfig> {
    config: C,
    registry: DriverRegistry,
}

impl DbFactory<EnvConfig> {
    /// Factory reading configuration from the environment.
    pub fn from_env() -> Self {
        Self::new(EnvConfig::new())
    }
}

impl<C: ConfigSource> DbFactory<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            registry: DriverRegistry::new(),
        }
    }

    /// The registry consulted during resolution. Additional drivers are
    /// registered through this handle.
    pub fn registry(&self) -> &DriverRegistry {
        &self.registry
    }

    /// Identifier of the built-in embedded engine.
    pub fn default_driver(&self) -> &'static str {
        DEFAULT_DRIVER
    }

    /// Default connection URL for a registered driver.
    ///
    /// The URL points into the configuration home directory; when the home
    /// cannot be read the current working directory is used instead.
    /// Panics when `driver` is not registered.
    pub fn default_url_for(&self, driver: &str) -> String {
        let base = match self.config.home() {
            Ok(home) => home,
            Err(err) => {
                debug!("config home unavailable ({}), using working directory", err);
                env::current_dir().unwrap_or_else(|_| PathBuf::new())
            }
        };
        let path = base.join(DATA_DIR);
        self.registry.url_for(driver, &path.to_string_lossy())
    }

    /// Default connection URL for the default driver.
    pub fn default_url(&self) -> String {
        self.default_url_for(self.default_driver())
    }

    /// Update source for the local data set.
    pub fn db_update(&self) -> String {
        self.config
            .db_update()
            .unwrap_or_else(|| DEFAULT_UPDATE.to_string())
    }

    /// Resolves configuration into a validated driver/url pair.
    ///
    /// A custom driver that is not registered must come with an explicit
    /// URL; leaving the URL at its default is a misconfiguration and fails
    /// with the name of the missing setting.
    pub fn resolve(&self) -> Result<ResolvedConnection> {
        let driver = self
            .config
            .db_driver()
            .unwrap_or_else(|| DEFAULT_DRIVER.to_string());
        let url = self.config.db_url().unwrap_or_else(|| self.default_url());

        if driver != DEFAULT_DRIVER && !self.registry.exists(&driver) && url == self.default_url()
        {
            return Err(DbError::MissingSetting(keys::DB_URL));
        }

        debug!("resolved driver {} with url {}", driver, url);
        Ok(ResolvedConnection { driver, url })
    }

    /// Resolves the connection and opens the storage backend behind it.
    ///
    /// Backend failures pass through unchanged.
    pub fn build(&self) -> Result<Box<dyn Storage>> {
        let resolved = self.resolve()?;
        let storage = SqliteStorage::open(&resolved)?;
        Ok(Box::new(storage))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    struct StubConfig {
        driver: Option<&'static str>,
        url: Option<&'static str>,
        home: Option<PathBuf>,
    }

    impl ConfigSource for StubConfig {
        fn db_driver(&self) -> Option<String> {
            self.driver.map(str::to_string)
        }

        fn db_url(&self) -> Option<String> {
            self.url.map(str::to_string)
        }

        fn home(&self) -> io::Result<PathBuf> {
            self.home
                .clone()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home"))
        }

        fn db_update(&self) -> Option<String> {
            None
        }
    }

    fn factory(
        driver: Option<&'static str>,
        url: Option<&'static str>,
    ) -> DbFactory<StubConfig> {
        DbFactory::new(StubConfig {
            driver,
            url,
            home: Some(PathBuf::from("/home/u")),
        })
    }

    #[test]
    fn default_url_joins_home_and_data_dir() {
        assert_eq!(factory(None, None).default_url(), "/home/u/data/store.db");
    }

    #[test]
    fn default_url_matches_default_driver_shorthand() {
        let factory = factory(None, None);
        assert_eq!(factory.default_url(), factory.default_url_for(DEFAULT_DRIVER));
    }

    #[test]
    fn home_failure_falls_back_to_working_directory() {
        let factory = DbFactory::new(StubConfig {
            driver: None,
            url: None,
            home: None,
        });
        let expected = env::current_dir().unwrap().join(DATA_DIR);
        assert_eq!(
            factory.default_url(),
            format!("{}/store.db", expected.to_string_lossy())
        );
    }

    #[test]
    fn unset_config_resolves_to_defaults() {
        let resolved = factory(None, None).resolve().unwrap();
        assert_eq!(resolved.driver, DEFAULT_DRIVER);
        assert_eq!(resolved.url, "/home/u/data/store.db");
    }

    #[test]
    fn default_driver_resolves_with_any_url() {
        let resolved = factory(None, Some("engine:custom:/elsewhere"))
            .resolve()
            .unwrap();
        assert_eq!(resolved.driver, DEFAULT_DRIVER);
        assert_eq!(resolved.url, "engine:custom:/elsewhere");
    }

    #[test]
    fn custom_driver_without_custom_url_is_rejected() {
        let err = factory(Some("org.example.Driver"), None)
            .resolve()
            .unwrap_err();
        assert!(matches!(err, DbError::MissingSetting(key) if key == keys::DB_URL));
    }

    #[test]
    fn custom_driver_with_url_left_at_default_is_rejected() {
        // Explicitly supplying the default URL is still a misconfiguration.
        let err = factory(Some("org.example.Driver"), Some("/home/u/data/store.db"))
            .resolve()
            .unwrap_err();
        assert!(matches!(err, DbError::MissingSetting(_)));
    }

    #[test]
    fn custom_driver_with_explicit_url_resolves() {
        let resolved = factory(Some("org.example.Driver"), Some("engine:custom:/tmp/db"))
            .resolve()
            .unwrap();
        assert_eq!(resolved.driver, "org.example.Driver");
        assert_eq!(resolved.url, "engine:custom:/tmp/db");
    }

    #[test]
    fn registered_custom_driver_resolves_with_default_url() {
        let factory = factory(Some("duckdb"), None);
        factory.registry().register("duckdb", "duckdb:{path}");
        let resolved = factory.resolve().unwrap();
        assert_eq!(resolved.driver, "duckdb");
        assert_eq!(resolved.url, factory.default_url());
    }

    #[test]
    fn db_update_defaults_to_auto() {
        assert_eq!(factory(None, None).db_update(), "auto");
    }
}
