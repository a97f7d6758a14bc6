use thiserror::Error;

/// Errors that can occur while resolving or opening a database
#[derive(Error, Debug)]
pub enum DbError {
    /// A custom driver was configured without the settings it requires.
    #[error("a custom database driver was configured without setting {0}")]
    MissingSetting(&'static str),
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;
