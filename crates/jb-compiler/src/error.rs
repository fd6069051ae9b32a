//! Filter list loading errors

use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;

/// A requested filter-list file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read filter list '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Filter list '{}' is not valid UTF-8: {source}", .path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },
}

impl LoadError {
    /// Path of the list that failed.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Read { path, .. } | LoadError::Encoding { path, .. } => path,
        }
    }
}
