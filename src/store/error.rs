//! Store error types

use crate::routing::Title;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors returned by `PageStore`
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record exists for the title
    #[error("page not found: {0}")]
    NotFound(Title),

    /// Read, write, rename or enumeration failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
