//! Storage trait for the playlist persistence layer

use crate::error::Result;
use crate::types::{ActivePlaylist, CreatePlaylist, ListQuery, PlaylistSummary};
use async_trait::async_trait;

/// Playlist store seam
///
/// This trait abstracts the mutation and one-shot read operations of the
/// persistence layer so the presentation layer and the playback engine do not
/// depend on the `SQLite` implementation. Reactive subscriptions are exposed by
/// the concrete store, since channel types are an implementation concern.
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create a playlist with its initial track list. Conflicting names and
    /// already-known tracks are silently ignored.
    async fn create_playlist(&self, create: CreatePlaylist) -> Result<()>;

    /// "Quick add": create one single-track playlist per `(uri, name)` entry,
    /// preserving the caller's order.
    async fn create_single_track_playlists(&self, entries: &[(String, String)]) -> Result<()>;

    /// Delete a playlist; returns the URIs of tracks that were referenced only
    /// by this playlist and are now gone, so the caller can release any
    /// OS-level file permissions tied to them.
    async fn delete_playlist(&self, name: &str) -> Result<Vec<String>>;

    /// Replace a playlist's membership and shuffle flag wholesale. `removable`
    /// optionally carries a precomputed list of URIs only this playlist uses.
    /// Returns the track URIs actually removed from the store.
    async fn set_shuffle_and_contents(
        &self,
        name: &str,
        shuffle: bool,
        tracks: &[String],
        removable: Option<&[String]>,
    ) -> Result<Vec<String>>;

    /// Rename a playlist; membership rows follow the name.
    async fn rename_playlist(&self, old_name: &str, new_name: &str) -> Result<()>;

    /// Flip a playlist in or out of the live mix.
    async fn toggle_playlist_active(&self, name: &str) -> Result<()>;

    /// Set a playlist's mix volume (`[0.0, 1.0]`).
    async fn set_playlist_volume(&self, name: &str, volume: f64) -> Result<()>;

    /// Mark tracks of a playlist unreadable and re-derive the playlist's own
    /// error flag in the same transaction.
    async fn mark_tracks_errored(&self, name: &str, uris: &[String]) -> Result<()>;

    /// Delete track rows outright (permission-grant rollback path).
    async fn delete_tracks(&self, uris: &[String]) -> Result<()>;

    // ========================================================================
    // Reads
    // ========================================================================

    /// Filter the given URIs down to the ones not yet stored.
    async fn filter_new_tracks(&self, uris: &[String]) -> Result<Vec<String>>;

    /// List playlists matching the query parameters.
    async fn list_playlists(&self, query: &ListQuery) -> Result<Vec<PlaylistSummary>>;

    /// Whether at least one playlist is active.
    async fn any_active(&self) -> Result<bool>;

    /// Every active playlist with its ordered track URIs.
    async fn active_playlists(&self) -> Result<Vec<ActivePlaylist>>;

    /// Whether a playlist with this exact name exists.
    async fn playlist_exists(&self, name: &str) -> Result<bool>;

    /// All playlist names (validator input).
    async fn playlist_names(&self) -> Result<Vec<String>>;

    /// Ordered track URIs of one playlist.
    async fn playlist_tracks(&self, name: &str) -> Result<Vec<String>>;
}
