//! Storage layer
//!
//! The asset store persists its whole collection as a single blob under a
//! fixed key. This module defines the key/value contract it relies on and the
//! backends that implement it.
//!
//! ## Backends
//!
//! - **File**: one file per key in the data directory, written atomically
//! - **SQLite**: one row per key in a small key/value table
//! - **Memory**: process-local map, for tests and throwaway stores

pub mod error;
pub mod file;
pub mod memory;
pub mod sqlite;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use error::{StorageError, StorageResult};
pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;
pub use sqlite::{SqliteBlobStore, SCHEMA_VERSION};

/// Opaque key/value persistence used by the asset store
///
/// Writes must be durable before `set` returns: a `get` issued afterwards
/// observes the new value.
pub trait BlobStore: Send {
    /// Read the blob stored under `key`, if any
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Replace the blob stored under `key`
    fn set(&mut self, key: &str, value: &[u8]) -> StorageResult<()>;
}

/// Which blob backend to open from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON file per key
    #[default]
    File,
    /// SQLite key/value table
    Sqlite,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::File => write!(f, "file"),
            Backend::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Backend::File),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(format!(
                "Unknown storage backend '{}'. Use 'file' or 'sqlite'.",
                other
            )),
        }
    }
}
