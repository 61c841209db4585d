//! Filesystem access used for image relocation.

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};

/// The filesystem operations the inspection store relies on.
#[async_trait]
pub trait FileSystem: Send + Sync + std::fmt::Debug {
    /// Check whether `path` exists and is a directory.
    async fn dir_exists(&self, path: &Path) -> bool;

    /// Create `path` and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DirectoryCreate`] if the directory cannot be created.
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Move a file, overwriting any file already at `to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileMove`] if the source is missing or the move fails.
    async fn move_file(&self, from: &Path, to: &Path) -> Result<()>;
}

/// The local filesystem, via `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn dir_exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .is_ok_and(|meta| meta.is_dir())
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|source| Error::DirectoryCreate {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        let move_err = |source: std::io::Error| Error::FileMove {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        };

        // Fail before touching the destination when the source is gone.
        tokio::fs::metadata(from).await.map_err(move_err)?;

        if let Err(e) = tokio::fs::rename(from, to).await {
            // rename cannot cross filesystems
            debug!("rename failed ({}), copying {}", e, from.display());
            tokio::fs::copy(from, to).await.map_err(move_err)?;
            tokio::fs::remove_file(from).await.map_err(move_err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dir_exists() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFileSystem;

        assert!(fs.dir_exists(dir.path()).await);
        assert!(!fs.dir_exists(&dir.path().join("missing")).await);

        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();
        assert!(!fs.dir_exists(&file).await);
    }

    #[tokio::test]
    async fn test_create_dir_all_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("images");

        LocalFileSystem.create_dir_all(&nested).await.unwrap();
        assert!(nested.is_dir());

        // already present
        LocalFileSystem.create_dir_all(&nested).await.unwrap();
    }

    #[tokio::test]
    async fn test_move_file() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("picked.jpg");
        let to = dir.path().join("kept.jpg");
        std::fs::write(&from, b"jpeg bytes").unwrap();

        LocalFileSystem.move_file(&from, &to).await.unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_move_file_overwrites_destination() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("new.jpg");
        let to = dir.path().join("same.jpg");
        std::fs::write(&from, b"new").unwrap();
        std::fs::write(&to, b"old").unwrap();

        LocalFileSystem.move_file(&from, &to).await.unwrap();
        assert_eq!(std::fs::read(&to).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_move_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("missing.jpg");
        let to = dir.path().join("out.jpg");

        let err = LocalFileSystem.move_file(&from, &to).await.unwrap_err();
        assert!(matches!(err, Error::FileMove { .. }));
        assert!(!to.exists());
    }
}
