//! Reactive query subscriptions
//!
//! A [`ChangeNotifier`] carries a version counter over a `tokio::sync::watch`
//! channel; the storage context bumps it after every committed mutation. Each
//! `watch_*` function seeds a watch channel with an initial query result and
//! spawns a refresh task that re-issues its query whenever the data version
//! (or, for the listing, the query parameters) changes. Consumers only ever
//! observe committed states.
//!
//! The refresh task ends when every consumer has dropped its receiver or the
//! notifier side is gone, matching the "cancel when the owning scope is torn
//! down" rule.

use std::sync::Arc;

use drift_core::types::{ActivePlaylist, ListQuery, PlaylistSummary};
use sqlx::SqlitePool;
use tokio::sync::watch;

use crate::error::Result;
use crate::playlists;

/// Data-change signal shared by all subscriptions
///
/// Cloning is cheap; all clones feed the same channel.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: Arc<watch::Sender<u64>>,
}

impl ChangeNotifier {
    /// Create a fresh notifier at version 0
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Bump the data version, waking every subscription
    pub fn mark_changed(&self) {
        self.tx.send_modify(|version| *version = version.wrapping_add(1));
    }

    /// Subscribe to data-version changes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Live playlist listing
///
/// Re-issues the listing query whenever the data version changes or the
/// caller publishes new [`ListQuery`] parameters on `params`.
pub async fn watch_playlists(
    pool: SqlitePool,
    changes: &ChangeNotifier,
    mut params: watch::Receiver<ListQuery>,
) -> Result<watch::Receiver<Vec<PlaylistSummary>>> {
    let mut data = changes.subscribe();

    // Clone out of the borrow before awaiting so the future stays Send
    let query = params.borrow_and_update().clone();
    let initial = playlists::list(&pool, &query).await?;
    let (tx, rx) = watch::channel(initial);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = data.changed() => if changed.is_err() { break },
                changed = params.changed() => if changed.is_err() { break },
                () = tx.closed() => break,
            }

            let query = params.borrow_and_update().clone();
            match playlists::list(&pool, &query).await {
                Ok(rows) => {
                    if tx.send(rows).is_err() {
                        break;
                    }
                }
                Err(err) => tracing::warn!("playlist listing refresh failed: {err}"),
            }
        }
    });

    Ok(rx)
}

/// Live "at least one playlist is active" flag
pub async fn watch_any_active(
    pool: SqlitePool,
    changes: &ChangeNotifier,
) -> Result<watch::Receiver<bool>> {
    let mut data = changes.subscribe();

    let initial = playlists::any_active(&pool).await?;
    let (tx, rx) = watch::channel(initial);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = data.changed() => if changed.is_err() { break },
                () = tx.closed() => break,
            }

            match playlists::any_active(&pool).await {
                Ok(active) => {
                    if tx.send(active).is_err() {
                        break;
                    }
                }
                Err(err) => tracing::warn!("any-active refresh failed: {err}"),
            }
        }
    });

    Ok(rx)
}

/// Live active-playlists-with-ordered-tracks view (playback engine input)
pub async fn watch_active_playlists(
    pool: SqlitePool,
    changes: &ChangeNotifier,
) -> Result<watch::Receiver<Vec<ActivePlaylist>>> {
    let mut data = changes.subscribe();

    let initial = playlists::active_with_tracks(&pool).await?;
    let (tx, rx) = watch::channel(initial);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = data.changed() => if changed.is_err() { break },
                () = tx.closed() => break,
            }

            match playlists::active_with_tracks(&pool).await {
                Ok(active) => {
                    if tx.send(active).is_err() {
                        break;
                    }
                }
                Err(err) => tracing::warn!("active-playlists refresh failed: {err}"),
            }
        }
    });

    Ok(rx)
}

/// Live playlist-name set (validator input)
pub async fn watch_names(
    pool: SqlitePool,
    changes: &ChangeNotifier,
) -> Result<watch::Receiver<Vec<String>>> {
    let mut data = changes.subscribe();

    let initial = playlists::names(&pool).await?;
    let (tx, rx) = watch::channel(initial);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = data.changed() => if changed.is_err() { break },
                () = tx.closed() => break,
            }

            match playlists::names(&pool).await {
                Ok(names) => {
                    if tx.send(names).is_err() {
                        break;
                    }
                }
                Err(err) => tracing::warn!("name-set refresh failed: {err}"),
            }
        }
    });

    Ok(rx)
}
