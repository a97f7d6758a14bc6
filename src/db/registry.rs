//! Driver registry
//!
//! Maps driver identifiers to connection-string templates. The registry is
//! seeded with the embedded engine and stays mutable for the process
//! lifetime so callers can plug in additional drivers.

use std::collections::HashMap;
use std::sync::Mutex;

/// Identifier of the built-in embedded engine.
pub const DEFAULT_DRIVER: &str = "sqlite";

/// Placeholder substituted with a filesystem path when a template is
/// instantiated.
const PATH_PLACEHOLDER: &str = "{path}";

const DEFAULT_TEMPLATE: &str = "{path}/store.db";

/// Registry of driver identifiers and their connection-string templates.
///
/// All methods take `&self`; the map is guarded internally so one registry
/// can be shared across threads and entries are inserted atomically.
pub struct DriverRegistry {
    templates: Mutex<HashMap<String, String>>,
}

impl DriverRegistry {
    /// Creates a registry seeded with the embedded engine.
    pub fn new() -> Self {
        let mut templates = HashMap::new();
        templates.insert(DEFAULT_DRIVER.to_string(), DEFAULT_TEMPLATE.to_string());
        Self {
            templates: Mutex::new(templates),
        }
    }

    /// Test if a driver identifier is registered.
    pub fn exists(&self, driver: &str) -> bool {
        self.templates.lock().unwrap().contains_key(driver)
    }

    /// Instantiates the template registered for `driver` with a path.
    ///
    /// Panics when `driver` is not registered; check with `exists` first.
    pub fn url_for(&self, driver: &str, path: &str) -> String {
        let templates = self.templates.lock().unwrap();
        let template = templates
            .get(driver)
            .unwrap_or_else(|| panic!("driver not registered: {}", driver));
        template.replacen(PATH_PLACEHOLDER, path, 1)
    }

    /// Register a driver, overwriting any previous template.
    ///
    /// Templates are not validated; a malformed one shows up later as a
    /// bad connection string.
    pub fn register(&self, driver: impl Into<String>, template: impl Into<String>) {
        self.templates
            .lock()
            .unwrap()
            .insert(driver.into(), template.into());
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
