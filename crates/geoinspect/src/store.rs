//! The inspection store.
//!
//! All inspections live as one JSON list under a single key of a
//! [`KeyValueStore`]. Mutations are a plain read-modify-write of that list:
//! the last writer of the full list wins and nothing is locked across the
//! read and the write.
//!
//! The public operations fail soft. Errors are logged and absorbed, and the
//! caller gets an empty list, `None`, or an unchanged collection. The
//! `try_*` variants expose the underlying [`Result`] instead.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::files::FileSystem;
use crate::inspection::Inspection;
use crate::kv::KeyValueStore;
use crate::media::{MediaLibrary, MEDIA_LIBRARY_PERMISSION};

/// Default storage key for the inspection collection.
pub const DEFAULT_STORAGE_KEY: &str = "inspections";

/// Default media library album for relocated images.
pub const DEFAULT_ALBUM: &str = "Pictures";

/// Where the store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Key holding the serialized collection.
    pub storage_key: String,
    /// Directory relocated images are moved into.
    pub images_dir: PathBuf,
    /// Media library album relocated images are appended to.
    pub album: String,
}

impl StoreSettings {
    /// Settings with the default key and album.
    #[must_use]
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            images_dir: images_dir.into(),
            album: DEFAULT_ALBUM.to_string(),
        }
    }
}

/// Durable storage of the inspection collection and its images.
#[derive(Debug, Clone)]
pub struct InspectionStore {
    kv: Arc<dyn KeyValueStore>,
    fs: Arc<dyn FileSystem>,
    media: Arc<dyn MediaLibrary>,
    settings: StoreSettings,
}

impl InspectionStore {
    /// Create a store over the given collaborators.
    #[must_use]
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        fs: Arc<dyn FileSystem>,
        media: Arc<dyn MediaLibrary>,
        settings: StoreSettings,
    ) -> Self {
        Self {
            kv,
            fs,
            media,
            settings,
        }
    }

    /// The store's settings.
    #[must_use]
    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// All inspections in creation order. Empty on any failure.
    pub async fn list(&self) -> Vec<Inspection> {
        match self.try_list().await {
            Ok(inspections) => inspections,
            Err(e) => {
                error!("Error retrieving inspections: {}", e);
                Vec::new()
            }
        }
    }

    /// All inspections, newest first.
    pub async fn list_newest_first(&self) -> Vec<Inspection> {
        let mut inspections = self.list().await;
        inspections.reverse();
        inspections
    }

    /// The first inspection with the given id.
    pub async fn get(&self, id: &str) -> Option<Inspection> {
        self.list().await.into_iter().find(|i| i.id == id)
    }

    /// Number of stored inspections.
    pub async fn count(&self) -> usize {
        self.list().await.len()
    }

    /// Append an inspection. Ids are not checked for uniqueness.
    pub async fn save(&self, inspection: Inspection) {
        match self.try_save(inspection).await {
            Ok(()) => info!("Inspection saved successfully"),
            Err(e) => error!("Error saving inspection: {}", e),
        }
    }

    /// Remove the inspection with the given id, if present.
    pub async fn delete(&self, id: &str) {
        match self.try_delete(id).await {
            Ok(true) => info!("Inspection {} deleted successfully", id),
            Ok(false) => debug!("No inspection with id {}", id),
            Err(e) => error!("Error deleting inspection: {}", e),
        }
    }

    /// Remove every inspection.
    pub async fn reset(&self) {
        match self.try_reset().await {
            Ok(()) => info!("All inspections deleted successfully"),
            Err(e) => error!("Error deleting all inspections: {}", e),
        }
    }

    /// Move a picked image into durable storage and register it with the
    /// media library. Returns the new path, or `None` if anything failed.
    pub async fn relocate_image(&self, source: &Path) -> Option<PathBuf> {
        match self.try_relocate_image(source).await {
            Ok(path) => {
                info!("Image moved to: {}", path.display());
                Some(path)
            }
            Err(e) if e.is_permission_error() => {
                warn!("Permission to access media library is required!");
                None
            }
            Err(e) => {
                error!("Error moving image: {}", e);
                None
            }
        }
    }

    /// Read the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read, or [`Error::Decode`] if
    /// its contents are not a list of inspections.
    pub async fn try_list(&self) -> Result<Vec<Inspection>> {
        let key = &self.settings.storage_key;
        match self.kv.get(key).await? {
            None => Ok(Vec::new()),
            Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| Error::Decode {
                key: key.clone(),
                source,
            }),
        }
    }

    /// Append an inspection and persist the collection.
    ///
    /// An undecodable stored collection is replaced by one holding only the
    /// new inspection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn try_save(&self, inspection: Inspection) -> Result<()> {
        let (mut inspections, _) = self.load_for_update().await?;
        debug!("Saving inspection {}", inspection.id);
        inspections.push(inspection);
        self.write(&inspections).await
    }

    /// Remove the inspection with the given id. Returns whether one was removed.
    ///
    /// Nothing is written when the id is absent, unless the stored collection
    /// was undecodable, in which case it is replaced by an empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn try_delete(&self, id: &str) -> Result<bool> {
        let (mut inspections, replaced) = self.load_for_update().await?;
        let Some(pos) = inspections.iter().position(|i| i.id == id) else {
            if replaced {
                self.write(&inspections).await?;
            }
            return Ok(false);
        };
        inspections.remove(pos);
        self.write(&inspections).await?;
        Ok(true)
    }

    /// Remove the storage key entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be removed.
    pub async fn try_reset(&self) -> Result<()> {
        self.kv.remove(&self.settings.storage_key).await
    }

    /// Relocate an image, returning the failure instead of logging it.
    ///
    /// The destination directory may be created even when the move fails;
    /// no destination file is written unless the move succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PermissionDenied`] when the media library refuses
    /// access, or the filesystem or media library error otherwise.
    pub async fn try_relocate_image(&self, source: &Path) -> Result<PathBuf> {
        let file_name = source.file_name().ok_or_else(|| Error::FileMove {
            from: source.to_path_buf(),
            to: self.settings.images_dir.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"),
        })?;
        let dir = &self.settings.images_dir;
        let destination = dir.join(file_name);

        if !self.media.request_permission().await.is_granted() {
            return Err(Error::permission_denied(MEDIA_LIBRARY_PERMISSION));
        }

        if !self.fs.dir_exists(dir).await {
            self.fs.create_dir_all(dir).await?;
        }

        self.fs.move_file(source, &destination).await?;

        let asset = self.media.create_asset(&destination).await?;
        match self.media.get_album(&self.settings.album).await? {
            None => {
                self.media.create_album(&self.settings.album, &asset).await?;
            }
            Some(album) => {
                self.media
                    .add_assets_to_album(std::slice::from_ref(&asset), &album)
                    .await?;
            }
        }

        Ok(destination)
    }

    /// The collection to modify, and whether an undecodable payload was
    /// dropped in its place.
    async fn load_for_update(&self) -> Result<(Vec<Inspection>, bool)> {
        match self.try_list().await {
            Ok(inspections) => Ok((inspections, false)),
            Err(e @ Error::Decode { .. }) => {
                warn!("Discarding unreadable inspections: {}", e);
                Ok((Vec::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    async fn write(&self, inspections: &[Inspection]) -> Result<()> {
        let json = serde_json::to_string(inspections)?;
        self.kv.set(&self.settings.storage_key, &json).await
    }
}
