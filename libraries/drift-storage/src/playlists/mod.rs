//! Playlist vertical slice
//!
//! Every multi-step mutation runs inside one transaction: readers observe
//! either the pre- or post-mutation state, never an intermediate one. Insert
//! conflicts on unique keys are silently ignored; callers that need to know
//! which inserts were skipped check beforehand with `tracks::filter_new`.

use chrono::DateTime;
use drift_core::types::{
    ActivePlaylist, CreatePlaylist, ListQuery, Playlist, PlaylistSort, PlaylistSummary,
};
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::error::{Result, StorageError};
use crate::tracks;

// ============================================================================
// Mutations
// ============================================================================

/// Create a playlist with its initial track list
///
/// Inserts the playlist row, any track rows not yet present, and the
/// membership rows with `position` = list index. A conflicting playlist name
/// leaves the existing playlist entirely untouched; the dialog validators
/// prevent that path, but the existing membership must not be merged into
/// even without them.
pub async fn create(pool: &SqlitePool, playlist: &CreatePlaylist) -> Result<()> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        "INSERT INTO playlists (name, shuffle) VALUES (?, ?) ON CONFLICT(name) DO NOTHING",
    )
    .bind(&playlist.name)
    .bind(playlist.shuffle)
    .execute(&mut *tx)
    .await?;

    if inserted.rows_affected() == 0 {
        tracing::debug!("playlist {:?} already exists, create ignored", playlist.name);
        return Ok(());
    }

    tracks::insert_ignore_on(&mut *tx, &playlist.tracks).await?;
    insert_members_on(&mut *tx, &playlist.name, &playlist.tracks).await?;

    // Reused tracks may already be errored
    refresh_error_flag_on(&mut *tx, &playlist.name).await?;

    tx.commit().await?;

    tracing::debug!(
        "created playlist {:?} ({} tracks)",
        playlist.name,
        playlist.tracks.len()
    );

    Ok(())
}

/// "Quick add": create one single-track playlist per `(uri, name)` entry
///
/// The whole batch is one transaction and caller order is preserved, so the
/// playlists land in the store in the same order the files were picked.
pub async fn create_single_track_batch(pool: &SqlitePool, entries: &[(String, String)]) -> Result<()> {
    let mut tx = pool.begin().await?;

    for (uri, name) in entries {
        let inserted =
            sqlx::query("INSERT INTO playlists (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
                .bind(name)
                .execute(&mut *tx)
                .await?;

        // A name collision leaves the existing playlist's membership alone
        if inserted.rows_affected() == 0 {
            tracing::debug!("playlist {name:?} already exists, quick-add entry skipped");
            continue;
        }

        sqlx::query("INSERT INTO tracks (uri) VALUES (?) ON CONFLICT(uri) DO NOTHING")
            .bind(uri)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO playlist_tracks (playlist_name, track_uri, position) VALUES (?, ?, 0)
             ON CONFLICT(playlist_name, track_uri) DO NOTHING",
        )
        .bind(name)
        .bind(uri)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::debug!("quick-added {} single-track playlists", entries.len());

    Ok(())
}

/// Delete a playlist and its now-orphaned tracks
///
/// Returns the URIs of tracks that were referenced only by this playlist, so
/// the caller can release any OS-level file permissions tied to them. Tracks
/// shared with other playlists are left untouched.
pub async fn delete(pool: &SqlitePool, name: &str) -> Result<Vec<String>> {
    let mut tx = pool.begin().await?;

    let removed = tracks::exclusive_to_playlist_on(&mut *tx, name).await?;

    let result = sqlx::query("DELETE FROM playlists WHERE name = ?")
        .bind(name)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Playlist", name));
    }

    // Membership rows are already gone via cascade; drop the orphans
    tracks::delete_many_on(&mut *tx, &removed).await?;

    tx.commit().await?;

    tracing::debug!("deleted playlist {name:?}, removed {} orphaned tracks", removed.len());

    Ok(removed)
}

/// Replace a playlist's membership and shuffle flag wholesale
///
/// Tracks that were exclusive to this playlist and are absent from the new
/// list are deleted; genuinely new tracks are inserted; membership rows are
/// rewritten in the new order. `removable` optionally carries a precomputed
/// unique-usage result so the query is not run twice when the caller already
/// knows it. Returns the URIs actually removed from the store.
pub async fn set_shuffle_and_contents(
    pool: &SqlitePool,
    name: &str,
    shuffle: bool,
    new_tracks: &[String],
    removable: Option<&[String]>,
) -> Result<Vec<String>> {
    let mut tx = pool.begin().await?;

    let exclusive = match removable {
        Some(uris) => uris.to_vec(),
        None => tracks::exclusive_to_playlist_on(&mut *tx, name).await?,
    };
    let removed: Vec<String> = exclusive
        .into_iter()
        .filter(|uri| !new_tracks.contains(uri))
        .collect();

    let result = sqlx::query("UPDATE playlists SET shuffle = ? WHERE name = ?")
        .bind(shuffle)
        .bind(name)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Playlist", name));
    }

    sqlx::query("DELETE FROM playlist_tracks WHERE playlist_name = ?")
        .bind(name)
        .execute(&mut *tx)
        .await?;

    tracks::delete_many_on(&mut *tx, &removed).await?;
    tracks::insert_ignore_on(&mut *tx, new_tracks).await?;
    insert_members_on(&mut *tx, name, new_tracks).await?;

    // Membership changed, so the derived flag may flip either way
    refresh_error_flag_on(&mut *tx, name).await?;

    tx.commit().await?;

    tracing::debug!(
        "replaced contents of {name:?}: {} tracks, {} removed",
        new_tracks.len(),
        removed.len()
    );

    Ok(removed)
}

/// Rename a playlist
///
/// Membership rows follow via `ON UPDATE CASCADE`, so this is a single-row
/// update and needs no explicit transaction.
pub async fn rename(pool: &SqlitePool, old_name: &str, new_name: &str) -> Result<()> {
    let result = sqlx::query("UPDATE playlists SET name = ? WHERE name = ?")
        .bind(new_name)
        .bind(old_name)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Playlist", old_name));
    }

    Ok(())
}

/// Flip a playlist in or out of the live mix
pub async fn toggle_active(pool: &SqlitePool, name: &str) -> Result<()> {
    let result = sqlx::query("UPDATE playlists SET is_active = 1 - is_active WHERE name = ?")
        .bind(name)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Playlist", name));
    }

    Ok(())
}

/// Set a playlist's mix volume, clamped to `[0.0, 1.0]`
pub async fn set_volume(pool: &SqlitePool, name: &str, volume: f64) -> Result<()> {
    let result = sqlx::query("UPDATE playlists SET volume = ? WHERE name = ?")
        .bind(volume.clamp(0.0, 1.0))
        .bind(name)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Playlist", name));
    }

    Ok(())
}

/// Mark tracks of a playlist unreadable, then re-derive the playlist flag
///
/// The playlist's own `has_error` flips to true only once every member track
/// is errored. Both steps run in one transaction so the derived flag can
/// never be observed out of sync with the track rows.
pub async fn mark_tracks_errored(pool: &SqlitePool, name: &str, uris: &[String]) -> Result<()> {
    let mut tx = pool.begin().await?;

    tracks::mark_errored_on(&mut *tx, uris).await?;
    refresh_error_flag_on(&mut *tx, name).await?;

    tx.commit().await?;

    Ok(())
}

/// Re-derive a playlist's `has_error` from its current membership
///
/// True iff the playlist has at least one track and none of them is readable.
/// An empty playlist is never flagged.
async fn refresh_error_flag_on(conn: &mut SqliteConnection, name: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE playlists SET has_error = (
            EXISTS(
                SELECT 1 FROM playlist_tracks pt WHERE pt.playlist_name = playlists.name
            )
            AND NOT EXISTS(
                SELECT 1 FROM playlist_tracks pt
                INNER JOIN tracks t ON t.uri = pt.track_uri
                WHERE pt.playlist_name = playlists.name AND t.has_error = 0
            )
        )
        WHERE name = ?
        "#,
    )
    .bind(name)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Insert membership rows with `position` = list index
async fn insert_members_on(
    conn: &mut SqliteConnection,
    name: &str,
    uris: &[String],
) -> Result<()> {
    for (position, uri) in uris.iter().enumerate() {
        sqlx::query(
            "INSERT INTO playlist_tracks (playlist_name, track_uri, position) VALUES (?, ?, ?)
             ON CONFLICT(playlist_name, track_uri) DO NOTHING",
        )
        .bind(name)
        .bind(uri)
        .bind(position as i64)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

// ============================================================================
// Reads
// ============================================================================

/// Get a playlist by exact name
pub async fn get_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Playlist>> {
    let row = sqlx::query(
        "SELECT name, shuffle, is_active, volume, has_error, created_at
         FROM playlists WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    row.map(|row| {
        Ok(Playlist {
            name: row.get("name"),
            shuffle: row.get::<i64, _>("shuffle") != 0,
            is_active: row.get::<i64, _>("is_active") != 0,
            volume: row.get("volume"),
            has_error: row.get::<i64, _>("has_error") != 0,
            created_at: DateTime::from_timestamp(row.get::<i64, _>("created_at"), 0)
                .ok_or_else(|| StorageError::Query("invalid timestamp".to_string()))?,
        })
    })
    .transpose()
}

/// List playlists matching the query parameters
///
/// Free-text filter on the name (case-insensitive), one of four sort orders,
/// and a per-row single-track flag computed via join + count rather than
/// stored redundantly.
pub async fn list(pool: &SqlitePool, query: &ListQuery) -> Result<Vec<PlaylistSummary>> {
    let order_by = match query.sort {
        PlaylistSort::NameAsc => "p.name COLLATE NOCASE ASC",
        PlaylistSort::NameDesc => "p.name COLLATE NOCASE DESC",
        PlaylistSort::ActiveFirstNameAsc => "p.is_active DESC, p.name COLLATE NOCASE ASC",
        PlaylistSort::ActiveFirstNameDesc => "p.is_active DESC, p.name COLLATE NOCASE DESC",
    };

    let sql = format!(
        r#"
        SELECT
            p.name, p.shuffle, p.is_active, p.volume, p.has_error,
            COUNT(pt.track_uri) = 1 AS is_single_track
        FROM playlists p
        LEFT JOIN playlist_tracks pt ON pt.playlist_name = p.name
        WHERE p.name LIKE ? ESCAPE '\'
        GROUP BY p.name
        ORDER BY {order_by}
        "#
    );

    // The filter is a literal substring, not a pattern
    let escaped = query
        .filter
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let search_pattern = format!("%{escaped}%");

    let rows = sqlx::query(&sql)
        .bind(&search_pattern)
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| PlaylistSummary {
            name: row.get("name"),
            shuffle: row.get::<i64, _>("shuffle") != 0,
            is_active: row.get::<i64, _>("is_active") != 0,
            volume: row.get("volume"),
            has_error: row.get::<i64, _>("has_error") != 0,
            is_single_track: row.get::<i64, _>("is_single_track") != 0,
        })
        .collect())
}

/// Whether at least one playlist is active
///
/// Gates whether the global play/pause control is meaningful.
pub async fn any_active(pool: &SqlitePool) -> Result<bool> {
    let active: i64 =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM playlists WHERE is_active = 1)")
            .fetch_one(pool)
            .await?;

    Ok(active != 0)
}

/// Every active playlist with its ordered track URIs
///
/// This is what the playback engine consumes to know what to mix and at what
/// per-playlist volume. Active playlists without tracks still appear, with an
/// empty list.
pub async fn active_with_tracks(pool: &SqlitePool) -> Result<Vec<ActivePlaylist>> {
    let rows = sqlx::query(
        r#"
        SELECT p.name, p.shuffle, p.volume, pt.track_uri
        FROM playlists p
        LEFT JOIN playlist_tracks pt ON pt.playlist_name = p.name
        WHERE p.is_active = 1
        ORDER BY p.name COLLATE NOCASE, p.name, pt.position
        "#,
    )
    .fetch_all(pool)
    .await?;

    // The exact-name tiebreaker in the ORDER BY keeps rows of case-differing
    // names (equal under NOCASE) contiguous, so grouping on the previous
    // row's name is sound.
    let mut result: Vec<ActivePlaylist> = Vec::new();
    for row in rows {
        let name: String = row.get("name");
        if result.last().map(|p| p.name.as_str()) != Some(name.as_str()) {
            result.push(ActivePlaylist {
                name,
                shuffle: row.get::<i64, _>("shuffle") != 0,
                volume: row.get("volume"),
                tracks: Vec::new(),
            });
        }
        if let Some(uri) = row.get::<Option<String>, _>("track_uri") {
            if let Some(playlist) = result.last_mut() {
                playlist.tracks.push(uri);
            }
        }
    }

    Ok(result)
}

/// Whether a playlist with this exact name exists
pub async fn exists(pool: &SqlitePool, name: &str) -> Result<bool> {
    let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM playlists WHERE name = ?)")
        .bind(name)
        .fetch_one(pool)
        .await?;

    Ok(found != 0)
}

/// All playlist names (validator input)
pub async fn names(pool: &SqlitePool) -> Result<Vec<String>> {
    let names =
        sqlx::query_scalar::<_, String>("SELECT name FROM playlists ORDER BY name COLLATE NOCASE")
            .fetch_all(pool)
            .await?;

    Ok(names)
}

/// Ordered track URIs of one playlist
pub async fn tracks_of(pool: &SqlitePool, name: &str) -> Result<Vec<String>> {
    let uris = sqlx::query_scalar::<_, String>(
        "SELECT track_uri FROM playlist_tracks WHERE playlist_name = ? ORDER BY position",
    )
    .bind(name)
    .fetch_all(pool)
    .await?;

    Ok(uris)
}
