//! Storage errors.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),

    #[error("failed to access {path}")]
    Io {
        path: PathBuf,

        #[source]
        source: io::Error,
    },
}
