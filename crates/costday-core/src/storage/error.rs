//! Storage error handling
//!
//! Typed errors for blob store reads and writes, with hints on how to recover.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::codec::CodecError;

/// Errors that can occur while reading or writing persisted assets
#[derive(Error, Debug)]
pub enum StorageError {
    /// The data directory could not be created
    #[error("Cannot create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The OS refused access to a data file
    #[error("Permission denied for '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No room left to write the collection
    #[error("No space left to save assets to '{path}'.")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A data file exists but could not be read
    #[error("Cannot read saved assets from '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The collection could not be written
    #[error("Cannot save assets to '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The temp file was written but could not replace the target
    #[error("Cannot replace '{to}' with '{from}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Blob key cannot be mapped to a storage location
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    /// SQLite database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Collection could not be encoded or decoded
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl StorageError {
    /// Classify an I/O failure that happened while writing `path`
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        if error.kind() == io::ErrorKind::PermissionDenied {
            StorageError::PermissionDenied {
                path,
                source: error,
            }
        } else if is_disk_full_error(&error) {
            StorageError::DiskFull {
                path,
                source: error,
            }
        } else {
            StorageError::WriteError {
                path,
                source: error,
            }
        }
    }

    /// Whether the user can fix the cause and retry
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StorageError::DiskFull { .. }
                | StorageError::PermissionDenied { .. }
                | StorageError::Codec(CodecError::Decode(_))
        )
    }

    /// Hint shown alongside the error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::DiskFull { .. } => Some("Free up disk space; the next change will save everything again."),
            StorageError::PermissionDenied { .. } | StorageError::CreateDirectory { .. } => {
                Some("Make sure the data directory exists and is writable, or point data_dir elsewhere.")
            }
            StorageError::Codec(CodecError::NonFinitePrice { .. }) => {
                Some("Give the asset a finite price or delete it; nothing is saved until then.")
            }
            StorageError::Codec(CodecError::Decode(_)) => {
                Some("The saved assets could not be read and were ignored. Restore the data file from a backup to recover them.")
            }
            _ => None,
        }
    }
}

fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    ["no space left", "disk full", "quota exceeded", "not enough space"]
        .iter()
        .any(|needle| msg.contains(needle))
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
