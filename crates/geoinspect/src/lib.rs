//! `geoinspect` - A local store for geotagged, photo-backed inspections
//!
//! An inspection is a map point annotated with a photo, title, description,
//! marker color, and marker icon. This library persists the inspection
//! collection in a key-value store, moves picked photos into durable storage,
//! and registers them with a media library album.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod inspection;
pub mod kv;
pub mod logging;
pub mod media;
pub mod storage;
pub mod store;
pub mod wizard;

pub use config::Config;
pub use error::{Error, Result};
pub use files::{FileSystem, LocalFileSystem};
pub use inspection::{Coordinate, Inspection, MarkerIcon};
pub use kv::{KeyValueStore, MemoryKeyValueStore};
pub use logging::init_logging;
pub use media::{DirectoryMediaLibrary, MediaLibrary};
pub use storage::SqliteKeyValueStore;
pub use store::{InspectionStore, StoreSettings};
pub use wizard::{InspectionDetails, InspectionWizard};
