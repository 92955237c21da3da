//! Identifier types for icons.
//!
//! Library icons carry a client-generated [`IconId`]: the `WI` prefix, the
//! current Unix time in milliseconds and a three-digit random suffix. Any other
//! id (for example a numeric LaMetric catalogue id) is a foreign reference that
//! can be previewed but not edited.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix shared by every library icon id.
pub const LIBRARY_PREFIX: &str = "WI";

/// Thumbnail endpoint of the third-party icon catalogue.
pub const FOREIGN_THUMBNAIL_URL: &str = "https://developer.lametric.com/content/apps/icon_thumbs";

/// Number of trailing characters shown as the short form of an id.
pub const SHORT_ID_LEN: usize = 6;

/// Exclusive upper bound of the random id suffix.
const SUFFIX_RANGE: u16 = 1000;

/// Unique identifier of an icon in the library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconId(String);

impl IconId {
    /// Generates a new id from the current time.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_at(Utc::now())
    }

    /// Generates an id for the given instant.
    #[must_use]
    pub fn generate_at(now: DateTime<Utc>) -> Self {
        let suffix = fastrand::u16(..SUFFIX_RANGE);
        Self(format!("{LIBRARY_PREFIX}{}{suffix:03}", now.timestamp_millis()))
    }

    /// Parses a library id; returns `None` for foreign ids.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        (raw.len() > LIBRARY_PREFIX.len() && raw.starts_with(LIBRARY_PREFIX))
            .then(|| Self(raw.to_string()))
    }

    /// Creates an id from a raw store key without validation.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last few characters, used for compact display.
    #[must_use]
    pub fn short(&self) -> &str {
        let start = self.0.len().saturating_sub(SHORT_ID_LEN);
        self.0.get(start..).unwrap_or(&self.0)
    }

    /// Whether the id is empty (only possible for malformed stored records).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IconId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A reference to an icon typed by the user or stored in a form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IconRef {
    /// An icon owned by the library; editable.
    Library(IconId),
    /// An icon from the external catalogue; preview only.
    Foreign(String),
}

impl IconRef {
    /// Classifies a raw id string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match IconId::parse(raw) {
            Some(id) => Self::Library(id),
            None => Self::Foreign(raw.trim().to_string()),
        }
    }

    /// Whether the referenced icon can be opened in the editor.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Library(_))
    }

    /// Returns the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Library(id) => id.as_str(),
            Self::Foreign(raw) => raw,
        }
    }

    /// Thumbnail URL for foreign references.
    #[must_use]
    pub fn thumbnail_url(&self) -> Option<String> {
        match self {
            Self::Library(_) => None,
            Self::Foreign(raw) => Some(format!("{FOREIGN_THUMBNAIL_URL}/{raw}")),
        }
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
