//! Track vertical slice
//!
//! Tracks are keyed by resource URI and only exist while referenced by at
//! least one playlist; orphan cleanup lives in the playlist mutations. All
//! `IN (...)` helpers chunk their input so arbitrarily long URI lists never
//! hit the statement parameter cap.

use std::collections::HashSet;

use chrono::DateTime;
use drift_core::types::Track;
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::error::{Result, StorageError};

/// SQLite's default `SQLITE_MAX_VARIABLE_NUMBER`
pub(crate) const BIND_LIMIT: usize = 999;

/// Filter the given URIs down to the ones not yet stored
///
/// Preserves the caller's order and drops duplicates within the input. Used
/// before insertion so callers know which URIs still need a permission grant.
pub async fn filter_new(pool: &SqlitePool, uris: &[String]) -> Result<Vec<String>> {
    let mut conn = pool.acquire().await?;
    filter_new_on(&mut *conn, uris).await
}

pub(crate) async fn filter_new_on(
    conn: &mut SqliteConnection,
    uris: &[String],
) -> Result<Vec<String>> {
    let mut existing: HashSet<String> = HashSet::new();

    for chunk in uris.chunks(BIND_LIMIT) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!("SELECT uri FROM tracks WHERE uri IN ({placeholders})");

        let mut query = sqlx::query_scalar::<_, String>(&sql);
        for uri in chunk {
            query = query.bind(uri);
        }

        existing.extend(query.fetch_all(&mut *conn).await?);
    }

    let mut seen: HashSet<&str> = HashSet::new();
    Ok(uris
        .iter()
        .filter(|uri| !existing.contains(*uri) && seen.insert(uri.as_str()))
        .cloned()
        .collect())
}

/// Whether a track row exists for this URI
pub async fn exists(pool: &SqlitePool, uri: &str) -> Result<bool> {
    let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tracks WHERE uri = ?)")
        .bind(uri)
        .fetch_one(pool)
        .await?;

    Ok(found != 0)
}

/// Get a track by URI
pub async fn get_by_uri(pool: &SqlitePool, uri: &str) -> Result<Option<Track>> {
    let row = sqlx::query("SELECT uri, has_error, added_at FROM tracks WHERE uri = ?")
        .bind(uri)
        .fetch_optional(pool)
        .await?;

    row.map(|row| {
        Ok(Track {
            uri: row.get("uri"),
            has_error: row.get::<i64, _>("has_error") != 0,
            added_at: DateTime::from_timestamp(row.get::<i64, _>("added_at"), 0)
                .ok_or_else(|| StorageError::Query("invalid timestamp".to_string()))?,
        })
    })
    .transpose()
}

/// Delete track rows outright
///
/// This is the rollback path for tracks whose platform permission grant
/// failed after insert; membership rows cascade away with the track.
pub async fn delete_many(pool: &SqlitePool, uris: &[String]) -> Result<()> {
    let mut tx = pool.begin().await?;
    delete_many_on(&mut *tx, uris).await?;
    tx.commit().await?;

    Ok(())
}

pub(crate) async fn delete_many_on(conn: &mut SqliteConnection, uris: &[String]) -> Result<()> {
    for chunk in uris.chunks(BIND_LIMIT) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!("DELETE FROM tracks WHERE uri IN ({placeholders})");

        let mut query = sqlx::query(&sql);
        for uri in chunk {
            query = query.bind(uri);
        }

        query.execute(&mut *conn).await?;
    }

    Ok(())
}

/// Insert track rows, silently ignoring URIs already present
pub(crate) async fn insert_ignore_on(conn: &mut SqliteConnection, uris: &[String]) -> Result<()> {
    for uri in uris {
        sqlx::query("INSERT INTO tracks (uri) VALUES (?) ON CONFLICT(uri) DO NOTHING")
            .bind(uri)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// URIs referenced by this playlist and by no other (the unique-usage query)
///
/// These are the tracks that become orphans if the playlist drops them.
pub async fn exclusive_to_playlist(pool: &SqlitePool, playlist_name: &str) -> Result<Vec<String>> {
    let mut conn = pool.acquire().await?;
    exclusive_to_playlist_on(&mut *conn, playlist_name).await
}

pub(crate) async fn exclusive_to_playlist_on(
    conn: &mut SqliteConnection,
    playlist_name: &str,
) -> Result<Vec<String>> {
    let uris = sqlx::query_scalar::<_, String>(
        r#"
        SELECT track_uri FROM playlist_tracks
        WHERE playlist_name = ?
          AND track_uri NOT IN (
            SELECT track_uri FROM playlist_tracks WHERE playlist_name <> ?
          )
        ORDER BY position
        "#,
    )
    .bind(playlist_name)
    .bind(playlist_name)
    .fetch_all(&mut *conn)
    .await?;

    Ok(uris)
}

/// Mark tracks unreadable
pub(crate) async fn mark_errored_on(conn: &mut SqliteConnection, uris: &[String]) -> Result<()> {
    for chunk in uris.chunks(BIND_LIMIT) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!("UPDATE tracks SET has_error = 1 WHERE uri IN ({placeholders})");

        let mut query = sqlx::query(&sql);
        for uri in chunk {
            query = query.bind(uri);
        }

        query.execute(&mut *conn).await?;
    }

    Ok(())
}
