use async_trait::async_trait;
use drift_core::error::Result;
use drift_core::storage::PlaylistStore;
use drift_core::types::{ActivePlaylist, CreatePlaylist, ListQuery, PlaylistSummary};
use sqlx::SqlitePool;
use tokio::sync::watch;

use crate::observe::{self, ChangeNotifier};
use crate::{playlists, tracks};

/// SQLite-backed playlist store
///
/// Owns the change notifier: every successful mutation bumps it so the
/// `watch_*` subscriptions re-emit. One instance is shared between the UI
/// layer and the playback engine.
pub struct MixerStore {
    pool: SqlitePool,
    changes: ChangeNotifier,
}

impl MixerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            changes: ChangeNotifier::new(),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The data-change signal the subscriptions hang off
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.changes
    }

    // ========================================================================
    // Subscriptions (channel types are an implementation concern, so these
    // live on the concrete store rather than the trait)
    // ========================================================================

    /// Live playlist listing driven by a query-parameter channel
    pub async fn watch_playlists(
        &self,
        params: watch::Receiver<ListQuery>,
    ) -> Result<watch::Receiver<Vec<PlaylistSummary>>> {
        Ok(observe::watch_playlists(self.pool.clone(), &self.changes, params).await?)
    }

    /// Live "at least one playlist is active" flag
    pub async fn watch_any_active(&self) -> Result<watch::Receiver<bool>> {
        Ok(observe::watch_any_active(self.pool.clone(), &self.changes).await?)
    }

    /// Live active-playlists view for the playback engine
    pub async fn watch_active_playlists(&self) -> Result<watch::Receiver<Vec<ActivePlaylist>>> {
        Ok(observe::watch_active_playlists(self.pool.clone(), &self.changes).await?)
    }

    /// Live playlist-name set for the dialog validators
    pub async fn watch_names(&self) -> Result<watch::Receiver<Vec<String>>> {
        Ok(observe::watch_names(self.pool.clone(), &self.changes).await?)
    }
}

#[async_trait]
impl PlaylistStore for MixerStore {
    // Mutations

    async fn create_playlist(&self, create: CreatePlaylist) -> Result<()> {
        playlists::create(&self.pool, &create).await?;
        self.changes.mark_changed();
        Ok(())
    }

    async fn create_single_track_playlists(&self, entries: &[(String, String)]) -> Result<()> {
        playlists::create_single_track_batch(&self.pool, entries).await?;
        self.changes.mark_changed();
        Ok(())
    }

    async fn delete_playlist(&self, name: &str) -> Result<Vec<String>> {
        let removed = playlists::delete(&self.pool, name).await?;
        self.changes.mark_changed();
        Ok(removed)
    }

    async fn set_shuffle_and_contents(
        &self,
        name: &str,
        shuffle: bool,
        new_tracks: &[String],
        removable: Option<&[String]>,
    ) -> Result<Vec<String>> {
        let removed =
            playlists::set_shuffle_and_contents(&self.pool, name, shuffle, new_tracks, removable)
                .await?;
        self.changes.mark_changed();
        Ok(removed)
    }

    async fn rename_playlist(&self, old_name: &str, new_name: &str) -> Result<()> {
        playlists::rename(&self.pool, old_name, new_name).await?;
        self.changes.mark_changed();
        Ok(())
    }

    async fn toggle_playlist_active(&self, name: &str) -> Result<()> {
        playlists::toggle_active(&self.pool, name).await?;
        self.changes.mark_changed();
        Ok(())
    }

    async fn set_playlist_volume(&self, name: &str, volume: f64) -> Result<()> {
        playlists::set_volume(&self.pool, name, volume).await?;
        self.changes.mark_changed();
        Ok(())
    }

    async fn mark_tracks_errored(&self, name: &str, uris: &[String]) -> Result<()> {
        playlists::mark_tracks_errored(&self.pool, name, uris).await?;
        self.changes.mark_changed();
        Ok(())
    }

    async fn delete_tracks(&self, uris: &[String]) -> Result<()> {
        tracks::delete_many(&self.pool, uris).await?;
        self.changes.mark_changed();
        Ok(())
    }

    // Reads

    async fn filter_new_tracks(&self, uris: &[String]) -> Result<Vec<String>> {
        Ok(tracks::filter_new(&self.pool, uris).await?)
    }

    async fn list_playlists(&self, query: &ListQuery) -> Result<Vec<PlaylistSummary>> {
        Ok(playlists::list(&self.pool, query).await?)
    }

    async fn any_active(&self) -> Result<bool> {
        Ok(playlists::any_active(&self.pool).await?)
    }

    async fn active_playlists(&self) -> Result<Vec<ActivePlaylist>> {
        Ok(playlists::active_with_tracks(&self.pool).await?)
    }

    async fn playlist_exists(&self, name: &str) -> Result<bool> {
        Ok(playlists::exists(&self.pool, name).await?)
    }

    async fn playlist_names(&self) -> Result<Vec<String>> {
        Ok(playlists::names(&self.pool).await?)
    }

    async fn playlist_tracks(&self, name: &str) -> Result<Vec<String>> {
        Ok(playlists::tracks_of(&self.pool, name).await?)
    }
}
