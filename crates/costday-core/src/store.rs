//! Asset store
//!
//! The `AssetStore` owns the authoritative, ordered asset collection. It is
//! loaded once when the store is opened, and every mutation writes the full
//! collection back through the configured [`BlobStore`] before returning.
//!
//! ## Failure policy
//!
//! The store never fails outward. A missing, unreadable, or malformed blob
//! loads as an empty collection, and a failed write leaves the in-memory
//! change in place. Both are logged at `warn`. Callers that need to know
//! whether the last write landed can call [`AssetStore::try_save`].
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = AssetStore::open()?;
//!
//! store.add(Asset::new("Camera", today(), 19.90));
//!
//! let options = ViewOptions::new("cam", SortKey::Price, SortDirection::Descending);
//! let visible = store.view(&options, today());
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::codec;
use crate::config::Config;
use crate::events::{ChangeSink, StoreEvent};
use crate::models::Asset;
use crate::query::{self, Totals, ViewOptions};
use crate::storage::{
    Backend, BlobStore, FileBlobStore, SqliteBlobStore, StorageError, StorageResult,
};

/// Blob key holding the serialized collection
pub const STORAGE_KEY: &str = "savedAssets";

/// Owner of the asset collection
///
/// Mutations take `&mut self`, so there is exactly one writer at a time.
/// Share a store across threads by wrapping it in a `Mutex`.
pub struct AssetStore {
    /// Current collection, in insertion order
    assets: Vec<Asset>,
    /// Persistence substrate
    blobs: Box<dyn BlobStore>,
    /// Registered change listeners
    sinks: Vec<Box<dyn ChangeSink>>,
}

impl AssetStore {
    /// Open the store using the configuration from the default location
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(&config)
    }

    /// Open the store with the backend named by `config`
    pub fn open_with_config(config: &Config) -> Result<Self> {
        let blobs: Box<dyn BlobStore> = match config.backend {
            Backend::File => Box::new(FileBlobStore::new(config.blob_dir())),
            Backend::Sqlite => Box::new(
                SqliteBlobStore::open(&config.sqlite_path())
                    .context("Failed to open SQLite database")?,
            ),
        };
        Ok(Self::from_boxed(blobs))
    }

    /// Open the store over an explicit blob store and load its contents
    pub fn with_blob_store<B: BlobStore + 'static>(blobs: B) -> Self {
        Self::from_boxed(Box::new(blobs))
    }

    fn from_boxed(blobs: Box<dyn BlobStore>) -> Self {
        let mut store = Self {
            assets: Vec::new(),
            blobs,
            sinks: Vec::new(),
        };
        store.load();
        store
    }

    /// Register a listener for change events
    pub fn subscribe(&mut self, sink: impl ChangeSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    // ==================== Loading & Saving ====================

    /// Replace the in-memory collection with the persisted one
    ///
    /// Falls back to an empty collection when nothing is stored or the stored
    /// blob cannot be read or decoded.
    pub fn load(&mut self) {
        self.assets = match self.read_persisted() {
            Ok(Some(assets)) => {
                debug!(count = assets.len(), "loaded assets");
                assets
            }
            Ok(None) => {
                debug!("no saved assets, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(
                    error = %e,
                    hint = e.recovery_suggestion().unwrap_or_default(),
                    "could not load saved assets, starting empty"
                );
                Vec::new()
            }
        };
        self.notify(StoreEvent::Loaded {
            count: self.assets.len(),
        });
    }

    fn read_persisted(&self) -> StorageResult<Option<Vec<Asset>>> {
        match self.blobs.get(STORAGE_KEY)? {
            Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Write the full collection to the blob store
    pub fn try_save(&mut self) -> StorageResult<()> {
        let bytes = codec::encode(&self.assets).map_err(StorageError::from)?;
        self.blobs.set(STORAGE_KEY, &bytes)
    }

    fn save(&mut self) {
        if let Err(e) = self.try_save() {
            warn!(
                error = %e,
                count = self.assets.len(),
                recoverable = e.is_recoverable(),
                hint = e.recovery_suggestion().unwrap_or_default(),
                "failed to save assets; change kept in memory only"
            );
        }
    }

    fn notify(&self, event: StoreEvent) {
        for sink in &self.sinks {
            sink.emit(&event);
        }
    }

    // ==================== Mutations ====================

    /// Append an asset
    ///
    /// The caller supplies a fresh ID (see [`Asset::new`]).
    pub fn add(&mut self, asset: Asset) {
        let id = asset.id;
        self.assets.push(asset);
        self.save();
        debug!(%id, "added asset");
        self.notify(StoreEvent::Added { id });
    }

    /// Replace the asset with the same ID, keeping its position
    ///
    /// Does nothing to the collection if the ID is unknown.
    pub fn update(&mut self, asset: Asset) {
        let id = asset.id;
        let replaced = match self.assets.iter_mut().find(|a| a.id == id) {
            Some(existing) => {
                *existing = asset;
                true
            }
            None => false,
        };
        self.save();
        if replaced {
            debug!(%id, "updated asset");
            self.notify(StoreEvent::Updated { id });
        } else {
            debug!(%id, "update ignored, no such asset");
        }
    }

    /// Remove every asset with this ID
    pub fn delete(&mut self, id: Uuid) {
        self.delete_many(&[id]);
    }

    /// Remove every asset whose ID is listed, writing once
    pub fn delete_many(&mut self, ids: &[Uuid]) {
        let mut removed = Vec::new();
        self.assets.retain(|asset| {
            if ids.contains(&asset.id) {
                removed.push(asset.id);
                false
            } else {
                true
            }
        });
        self.save();
        debug!(removed = removed.len(), "deleted assets");
        for id in removed {
            self.notify(StoreEvent::Deleted { id });
        }
    }

    // ==================== Queries ====================

    /// Current collection in insertion order
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Number of assets held
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Look up an asset by ID
    pub fn get(&self, id: Uuid) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Assets whose ID starts with `prefix`
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<&Asset> {
        let prefix = prefix.to_ascii_lowercase();
        self.assets
            .iter()
            .filter(|a| a.id.to_string().starts_with(&prefix))
            .collect()
    }

    /// Filtered, sorted view of the current collection
    pub fn view(&self, options: &ViewOptions, reference: NaiveDate) -> Vec<Asset> {
        query::view(&self.assets, options, reference)
    }

    /// Totals over the view selected by `options`
    pub fn totals(&self, options: &ViewOptions, reference: NaiveDate) -> Totals {
        query::totals(&self.view(options, reference), reference)
    }
}
