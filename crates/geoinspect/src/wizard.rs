//! The add-inspection flow.
//!
//! Creating an inspection takes two selections followed by metadata entry:
//! pick a point, pick or capture a photo, then fill in title, description,
//! color, and icon. A record is persisted only when both selections succeeded
//! and the photo was moved into durable storage.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::inspection::{is_palette_color, Coordinate, Inspection, MarkerIcon, DEFAULT_COLOR};
use crate::store::InspectionStore;

/// Metadata entered on the final step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionDetails {
    /// Title of the inspection.
    pub title: String,
    /// Description; may be empty.
    pub description: String,
    /// Marker color, one of [`crate::inspection::PALETTE`].
    pub marker_color: String,
    /// Marker icon name.
    pub marker_icon: String,
}

impl Default for InspectionDetails {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            marker_color: DEFAULT_COLOR.to_string(),
            marker_icon: MarkerIcon::Default.name().to_string(),
        }
    }
}

impl InspectionDetails {
    /// Check the color and icon against the creation-time choices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] or [`Error::InvalidIcon`].
    pub fn validate(&self) -> Result<()> {
        if !is_palette_color(&self.marker_color) {
            return Err(Error::InvalidColor(self.marker_color.clone()));
        }
        if MarkerIcon::from_name(&self.marker_icon).is_none() {
            return Err(Error::InvalidIcon(self.marker_icon.clone()));
        }
        Ok(())
    }
}

/// State of one add-inspection flow.
#[derive(Debug, Clone, Default)]
pub struct InspectionWizard {
    location: Option<Coordinate>,
    image: Option<PathBuf>,
}

impl InspectionWizard {
    /// Start a new flow.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Step one: the point chosen on the map.
    pub fn select_location(&mut self, coordinate: Coordinate) -> &mut Self {
        debug!("Marker position: {}", coordinate);
        self.location = Some(coordinate);
        self
    }

    /// Step two: the photo picked from the camera or gallery.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] if no location has been selected.
    pub fn select_image(&mut self, path: impl Into<PathBuf>) -> Result<&mut Self> {
        if self.location.is_none() {
            return Err(Error::precondition("Please select a location first."));
        }
        self.image = Some(path.into());
        Ok(self)
    }

    /// The selected location, if any.
    #[must_use]
    pub fn location(&self) -> Option<Coordinate> {
        self.location
    }

    /// The selected image, if any.
    #[must_use]
    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    /// Final step: relocate the photo and persist the new inspection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] if a selection is missing,
    /// [`Error::InvalidColor`] or [`Error::InvalidIcon`] for bad metadata, and
    /// [`Error::ImageRelocation`] if the photo could not be moved. Nothing is
    /// persisted in any of these cases.
    pub async fn finish(
        &self,
        store: &InspectionStore,
        details: InspectionDetails,
    ) -> Result<Inspection> {
        let location = self
            .location
            .ok_or_else(|| Error::precondition("Please select a location first."))?;
        let image = self
            .image
            .as_deref()
            .ok_or_else(|| Error::precondition("Please select or take an image first."))?;
        details.validate()?;

        let image_uri = store
            .relocate_image(image)
            .await
            .ok_or_else(|| Error::ImageRelocation {
                path: image.to_path_buf(),
            })?;

        let inspection = Inspection {
            id: Uuid::new_v4().to_string(),
            latitude: location.latitude,
            longitude: location.longitude,
            image_uri: image_uri.to_string_lossy().into_owned(),
            marker_color: details.marker_color,
            marker_icon: details.marker_icon,
            title: details.title,
            description: details.description,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        store.try_save(inspection.clone()).await?;
        info!("Created inspection {}", inspection.id);
        Ok(inspection)
    }
}
