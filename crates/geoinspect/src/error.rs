//! Error types for geoinspect.
//!
//! This module defines all error types used throughout the geoinspect crate.
//! The store's fail-soft operations absorb these at their boundary; the
//! fallible `try_*` variants and the creation wizard surface them directly.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for geoinspect operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// The stored collection could not be decoded.
    #[error("failed to decode inspections stored under '{key}': {source}")]
    Decode {
        /// Storage key holding the collection.
        key: String,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Permission Errors ===
    /// A required permission was not granted.
    #[error("permission denied: {permission}")]
    PermissionDenied {
        /// Name of the permission that was refused.
        permission: String,
    },

    // === Wizard Errors ===
    /// A step of the creation flow was attempted out of order.
    #[error("{0}")]
    Precondition(String),

    /// The marker color is not part of the palette.
    #[error("marker color '{0}' is not in the palette")]
    InvalidColor(String),

    /// The marker icon is not part of the icon set.
    #[error("unknown marker icon '{0}'")]
    InvalidIcon(String),

    /// The picked image could not be moved into durable storage.
    #[error("failed to relocate image {path}")]
    ImageRelocation {
        /// The source image path.
        path: PathBuf,
    },

    // === Media Library Errors ===
    /// A media library operation failed.
    #[error("media library error: {0}")]
    MediaLibrary(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to move a file.
    #[error("failed to move {from} to {to}: {source}")]
    FileMove {
        /// Source path.
        from: PathBuf,
        /// Destination path.
        to: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for geoinspect operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new precondition error.
    #[must_use]
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    /// Create a new media library error.
    #[must_use]
    pub fn media_library(message: impl Into<String>) -> Self {
        Self::MediaLibrary(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a permission denied error.
    #[must_use]
    pub fn permission_denied(permission: impl Into<String>) -> Self {
        Self::PermissionDenied {
            permission: permission.into(),
        }
    }

    /// Check if this error is a permission issue.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// Check if this error is an unmet precondition of the creation flow.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::precondition("Please select or take an image first.");
        assert_eq!(err.to_string(), "Please select or take an image first.");

        let err = Error::media_library("album unavailable");
        assert_eq!(err.to_string(), "media library error: album unavailable");
    }

    #[test]
    fn test_error_is_precondition() {
        assert!(Error::precondition("no image").is_precondition());
        assert!(!Error::internal("test").is_precondition());
    }

    #[test]
    fn test_error_is_permission_error() {
        let err = Error::permission_denied("media library");
        assert!(err.is_permission_error());
        assert!(err.to_string().contains("media library"));
        assert!(!Error::precondition("x").is_permission_error());
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_invalid_marker_errors() {
        let err = Error::InvalidColor("#000000".to_string());
        assert!(err.to_string().contains("#000000"));

        let err = Error::InvalidIcon("rocket".to_string());
        assert!(err.to_string().contains("rocket"));
    }

    #[test]
    fn test_image_relocation_error_display() {
        let err = Error::ImageRelocation {
            path: PathBuf::from("/tmp/picked.jpg"),
        };
        assert!(err.to_string().contains("/tmp/picked.jpg"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_decode_error_display() {
        let json_err = serde_json::from_str::<Vec<i32>>("not valid json").unwrap_err();
        let err = Error::Decode {
            key: "inspections".to_string(),
            source: json_err,
        };
        assert!(err.to_string().contains("inspections"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "storage_key must not be empty".to_string(),
        };
        assert!(err.to_string().contains("storage_key"));
    }

    #[test]
    fn test_file_move_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::FileMove {
            from: PathBuf::from("/tmp/a.jpg"),
            to: PathBuf::from("/data/images/a.jpg"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/a.jpg"));
        assert!(msg.contains("/data/images/a.jpg"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
