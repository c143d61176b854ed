/// Playlist domain types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Playlist
///
/// A named, ordered collection of tracks with its own volume, shuffle and
/// active state. The name is the identity: renames cascade through the
/// membership table at the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist name
    pub name: String,

    /// Whether playback order is shuffled
    pub shuffle: bool,

    /// Whether the playlist is part of the live mix
    pub is_active: bool,

    /// Mix volume in `[0.0, 1.0]`
    pub volume: f64,

    /// True iff every member track is unreadable
    pub has_error: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    /// Create a new playlist with default mix state
    pub fn new(name: impl Into<String>, shuffle: bool) -> Self {
        Self {
            name: name.into(),
            shuffle,
            is_active: false,
            volume: 1.0,
            has_error: false,
            created_at: Utc::now(),
        }
    }
}

/// Data for creating a new playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePlaylist {
    /// Playlist name
    pub name: String,

    /// Initial shuffle flag
    pub shuffle: bool,

    /// Member track URIs in playback order
    pub tracks: Vec<String>,
}

impl CreatePlaylist {
    /// Create a new playlist description
    pub fn new(name: impl Into<String>, shuffle: bool, tracks: Vec<String>) -> Self {
        Self {
            name: name.into(),
            shuffle,
            tracks,
        }
    }
}

/// One row of the playlist listing, as the main screen renders it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    /// Playlist name
    pub name: String,

    /// Shuffle flag
    pub shuffle: bool,

    /// Whether the playlist is part of the live mix
    pub is_active: bool,

    /// Mix volume in `[0.0, 1.0]`
    pub volume: f64,

    /// True iff every member track is unreadable
    pub has_error: bool,

    /// Whether the playlist holds exactly one track (quick-add entries get a
    /// leaner row treatment). Derived at query time, never stored.
    pub is_single_track: bool,
}

/// An active playlist together with its ordered track URIs
///
/// This is what the playback engine consumes to know what to mix and at what
/// per-playlist volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivePlaylist {
    /// Playlist name
    pub name: String,

    /// Shuffle flag
    pub shuffle: bool,

    /// Mix volume in `[0.0, 1.0]`
    pub volume: f64,

    /// Member track URIs in stored order
    pub tracks: Vec<String>,
}

/// Sort order for the playlist listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistSort {
    /// Name ascending (case-insensitive)
    NameAsc,
    /// Name descending (case-insensitive)
    NameDesc,
    /// Active playlists first, then name ascending
    ActiveFirstNameAsc,
    /// Active playlists first, then name descending
    ActiveFirstNameDesc,
}

impl PlaylistSort {
    /// String form used for preference storage
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaylistSort::NameAsc => "name_asc",
            PlaylistSort::NameDesc => "name_desc",
            PlaylistSort::ActiveFirstNameAsc => "active_name_asc",
            PlaylistSort::ActiveFirstNameDesc => "active_name_desc",
        }
    }

    /// Parse the preference-storage string form
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "name_asc" => Some(PlaylistSort::NameAsc),
            "name_desc" => Some(PlaylistSort::NameDesc),
            "active_name_asc" => Some(PlaylistSort::ActiveFirstNameAsc),
            "active_name_desc" => Some(PlaylistSort::ActiveFirstNameDesc),
            _ => None,
        }
    }
}

impl Default for PlaylistSort {
    fn default() -> Self {
        PlaylistSort::NameAsc
    }
}

/// Current parameters of the playlist listing query
///
/// The listing subscription re-issues its query whenever this value changes,
/// so the UI owns exactly one of these and updates it in place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Free-text name filter; empty matches everything
    pub filter: String,

    /// Sort order
    pub sort: PlaylistSort,
}

impl ListQuery {
    /// Create a listing query
    pub fn new(filter: impl Into<String>, sort: PlaylistSort) -> Self {
        Self {
            filter: filter.into(),
            sort,
        }
    }
}
