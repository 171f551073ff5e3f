//! Environment loading helpers

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error)]
pub enum EnvError {
    /// The requested env file could not be read or parsed
    #[error("failed to load env file {path}: {source}")]
    FileLoad {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// A required variable is unset or empty
    #[error("{0} environment variable not set")]
    Missing(String),

    /// A variable is set but is not valid unicode
    #[error("{0} environment variable is not valid unicode")]
    NotUnicode(String),
}

/// Load variables from an env file into the process environment.
///
/// With `Some(path)` the file must exist. With `None` a `.env` in the current
/// directory (or a parent) is loaded if present. Variables already set in the
/// process environment win over file entries.
///
/// Returns the path that was loaded, if any.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, EnvError> {
    match path {
        Some(path) => dotenvy::from_path(path)
            .map(|()| Some(path.to_path_buf()))
            .map_err(|source| EnvError::FileLoad {
                path: path.to_path_buf(),
                source,
            }),
        None => match dotenvy::dotenv() {
            Ok(found) => Ok(Some(found)),
            Err(e) if e.not_found() => Ok(None),
            Err(source) => Err(EnvError::FileLoad {
                path: PathBuf::from(".env"),
                source,
            }),
        },
    }
}

/// Read a required, non-empty environment variable
pub fn require_var(name: &str) -> Result<String, EnvError> {
    optional_var(name)?.ok_or_else(|| EnvError::Missing(name.to_string()))
}

/// Read an optional environment variable; empty values count as unset
pub fn optional_var(name: &str) -> Result<Option<String>, EnvError> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(EnvError::NotUnicode(name.to_string())),
    }
}
