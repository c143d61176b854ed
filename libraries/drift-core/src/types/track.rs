/// Track domain types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Track
///
/// A single audio resource identified by URI, shared across playlists. The URI
/// itself is the key; a track row exists only while at least one playlist
/// references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Resource URI (unique)
    pub uri: String,

    /// Set when the underlying resource became unreadable
    pub has_error: bool,

    /// When the track was first referenced by any playlist
    pub added_at: DateTime<Utc>,
}

impl Track {
    /// Create a new, readable track
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            has_error: false,
            added_at: Utc::now(),
        }
    }
}
