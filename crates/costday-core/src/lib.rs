//! costday core library
//!
//! Records purchased items ("assets") and derives how much each one has cost
//! per day of ownership so far.
//!
//! # Architecture
//!
//! - **Store**: owns the ordered collection and writes it through on every
//!   change
//! - **Query**: pure filter/sort/aggregate functions over a snapshot
//! - **Storage**: opaque key/value blob backends (file, SQLite, memory)
//!
//! # Quick Start
//!
//! ```text
//! let mut store = AssetStore::open()?;
//!
//! store.add(Asset::new("Camera", today(), 19.90));
//!
//! let options = ViewOptions::new("", SortKey::AverageDailyPrice, SortDirection::Descending);
//! let assets = store.view(&options, today());
//! let totals = query::totals(&assets, today());
//! ```
//!
//! # Modules
//!
//! - `store`: The asset store (main entry point)
//! - `models`: The `Asset` record and day-count helpers
//! - `query`: Search, sorting, derived rows and totals
//! - `codec`: Byte encoding of the collection
//! - `events`: Change notifications
//! - `storage`: Blob store backends
//! - `config`: Application configuration

pub mod codec;
pub mod config;
pub mod events;
pub mod models;
pub mod query;
pub mod storage;
pub mod store;

pub use codec::CodecError;
pub use config::Config;
pub use events::{ChangeSink, RecordingSink, StoreEvent};
pub use models::{days_between, today, Asset};
pub use query::{AssetRow, SortDirection, SortKey, Totals, ViewOptions};
pub use storage::{Backend, BlobStore, MemoryBlobStore, StorageError, StorageResult};
pub use store::{AssetStore, STORAGE_KEY};
