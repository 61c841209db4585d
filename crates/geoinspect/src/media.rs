//! Media library registration for relocated images.
//!
//! After an image is moved into the application's private storage it is also
//! registered with the user-visible media library and appended to a named
//! album, so the photo stays reachable outside the application.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Name of the permission requested from the media library.
pub const MEDIA_LIBRARY_PERMISSION: &str = "media library";

/// Outcome of a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// Access was granted.
    Granted,
    /// Access was refused.
    Denied,
}

impl PermissionStatus {
    /// Whether access was granted.
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// A file registered with the media library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Library-assigned identifier.
    pub id: String,
    /// Location of the asset's file inside the library.
    pub path: PathBuf,
}

/// A named collection of assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    /// Album name.
    pub name: String,
    /// Location of the album inside the library.
    pub path: PathBuf,
}

/// The media library API the inspection store relies on.
#[async_trait]
pub trait MediaLibrary: Send + Sync + std::fmt::Debug {
    /// Ask for permission to write to the library.
    async fn request_permission(&self) -> PermissionStatus;

    /// Register the file at `path` as a new asset.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or stored.
    async fn create_asset(&self, path: &Path) -> Result<Asset>;

    /// Look up an album by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the library cannot be queried.
    async fn get_album(&self, name: &str) -> Result<Option<Album>>;

    /// Create an album whose first member is `asset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the album cannot be created.
    async fn create_album(&self, name: &str, asset: &Asset) -> Result<Album>;

    /// Append assets to an existing album.
    ///
    /// # Errors
    ///
    /// Returns an error if any asset cannot be added.
    async fn add_assets_to_album(&self, assets: &[Asset], album: &Album) -> Result<()>;
}

/// A media library kept in a gallery directory.
///
/// Assets are copies of the registered files in the gallery root, named by
/// the BLAKE3 hash of their contents. Each album is a subdirectory of
/// `albums/` holding copies of its assets.
#[derive(Debug, Clone)]
pub struct DirectoryMediaLibrary {
    root: PathBuf,
    permission_granted: bool,
}

impl DirectoryMediaLibrary {
    /// Create a library rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, permission_granted: bool) -> Self {
        Self {
            root: root.into(),
            permission_granted,
        }
    }

    /// The gallery root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn album_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::media_library(format!("invalid album name: {name:?}")));
        }
        Ok(self.root.join("albums").join(name))
    }

    async fn copy_into(dir: &Path, asset: &Asset) -> Result<()> {
        let file_name = asset
            .path
            .file_name()
            .ok_or_else(|| Error::media_library(format!("asset {} has no file name", asset.id)))?;
        tokio::fs::copy(&asset.path, dir.join(file_name)).await?;
        Ok(())
    }
}

#[async_trait]
impl MediaLibrary for DirectoryMediaLibrary {
    async fn request_permission(&self) -> PermissionStatus {
        if self.permission_granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    async fn create_asset(&self, path: &Path) -> Result<Asset> {
        let bytes = tokio::fs::read(path).await?;
        let id = blake3::hash(&bytes).to_hex().to_string();

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| Error::DirectoryCreate {
                path: self.root.clone(),
                source,
            })?;

        let mut asset_path = self.root.join(&id);
        if let Some(ext) = path.extension() {
            asset_path.set_extension(ext);
        }
        tokio::fs::write(&asset_path, &bytes).await?;

        debug!("Registered asset {} from {}", &id[..16], path.display());
        Ok(Asset {
            id,
            path: asset_path,
        })
    }

    async fn get_album(&self, name: &str) -> Result<Option<Album>> {
        let path = self.album_path(name)?;
        let exists = tokio::fs::metadata(&path)
            .await
            .is_ok_and(|meta| meta.is_dir());
        Ok(exists.then(|| Album {
            name: name.to_string(),
            path,
        }))
    }

    async fn create_album(&self, name: &str, asset: &Asset) -> Result<Album> {
        let path = self.album_path(name)?;
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|source| Error::DirectoryCreate {
                path: path.clone(),
                source,
            })?;
        Self::copy_into(&path, asset).await?;

        info!("Created album '{}'", name);
        Ok(Album {
            name: name.to_string(),
            path,
        })
    }

    async fn add_assets_to_album(&self, assets: &[Asset], album: &Album) -> Result<()> {
        for asset in assets {
            Self::copy_into(&album.path, asset).await?;
        }
        debug!("Added {} asset(s) to album '{}'", assets.len(), album.name);
        Ok(())
    }
}
