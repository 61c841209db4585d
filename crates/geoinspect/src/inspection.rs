//! Core inspection types for geoinspect.
//!
//! This module defines the inspection record, the marker palette and icon
//! set offered at creation time, and map coordinates.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Marker colors offered when creating an inspection. The first is the default.
pub const PALETTE: [&str; 7] = [
    "#D32F2F", "#E64A19", "#FBC02D", "#388E3C", "#1976D2", "#512DA8", "#7B1FA2",
];

/// The default marker color.
pub const DEFAULT_COLOR: &str = PALETTE[0];

/// Check whether a color is part of the creation palette (case-insensitive).
#[must_use]
pub fn is_palette_color(color: &str) -> bool {
    PALETTE.iter().any(|c| c.eq_ignore_ascii_case(color))
}

/// Icon drawn inside a map marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerIcon {
    /// Plain pin.
    #[default]
    Default,
    /// Hazard or warning.
    Warning,
    /// Construction work.
    Construction,
    /// Electrical installation.
    Electric,
    /// Water or plumbing.
    Water,
    /// Vegetation.
    Tree,
    /// Road surface.
    Road,
    /// Building.
    Building,
}

impl MarkerIcon {
    /// Every icon in display order.
    pub const ALL: [MarkerIcon; 8] = [
        Self::Default,
        Self::Warning,
        Self::Construction,
        Self::Electric,
        Self::Water,
        Self::Tree,
        Self::Road,
        Self::Building,
    ];

    /// The stored name of this icon.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Warning => "warning",
            Self::Construction => "construction",
            Self::Electric => "electric",
            Self::Water => "water",
            Self::Tree => "tree",
            Self::Road => "road",
            Self::Building => "building",
        }
    }

    /// Look up an icon by its stored name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|icon| icon.name() == name)
    }

    /// Resolve a stored name for rendering, falling back to [`MarkerIcon::Default`].
    #[must_use]
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }
}

impl std::fmt::Display for MarkerIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A point on the map.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both components are finite and within their ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// One user-created annotated point of interest.
///
/// Field names serialize in camelCase so the persisted collection keeps the
/// layout the application has always written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    /// Unique identifier, generated at creation.
    pub id: String,
    /// Latitude of the inspection location.
    pub latitude: f64,
    /// Longitude of the inspection location.
    pub longitude: f64,
    /// Path of the image in durable storage.
    pub image_uri: String,
    /// Hex color of the map marker.
    pub marker_color: String,
    /// Name of the marker icon.
    pub marker_icon: String,
    /// Title of the inspection.
    pub title: String,
    /// Free-form description, possibly empty.
    pub description: String,
    /// ISO-8601 creation time.
    pub timestamp: String,
}

impl Inspection {
    /// The inspection's location.
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// The icon to draw, falling back to the default for unknown names.
    #[must_use]
    pub fn icon(&self) -> MarkerIcon {
        MarkerIcon::resolve(&self.marker_icon)
    }

    /// Whether the description should be displayed.
    #[must_use]
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }

    /// Parse the creation timestamp.
    #[must_use]
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Creation time formatted for display in local time, 24-hour clock.
    ///
    /// Unparseable timestamps are shown verbatim.
    #[must_use]
    pub fn display_timestamp(&self) -> String {
        self.recorded_at().map_or_else(
            || self.timestamp.clone(),
            |dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        )
    }
}
