//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using real SQLite files (not
//! in-memory) to match production behavior and properly test migrations,
//! constraints, and cascade rules.

use sqlx::SqlitePool;
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        // Initialize logging once
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(tracing::Level::DEBUG)
                .try_init();
        });

        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = drift_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        drift_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Turn a `&str` slice into owned URIs/names
pub fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

/// Test fixture: create a playlist with the given tracks
pub async fn create_test_playlist(pool: &SqlitePool, name: &str, tracks: &[&str]) {
    drift_storage::playlists::create(
        pool,
        &drift_core::types::CreatePlaylist::new(name, false, strings(tracks)),
    )
    .await
    .expect("Failed to create test playlist");
}

/// Count the membership rows of one playlist
pub async fn membership_count(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM playlist_tracks WHERE playlist_name = ?")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("Failed to count membership rows")
}

/// Count all track rows
pub async fn track_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM tracks")
        .fetch_one(pool)
        .await
        .expect("Failed to count tracks")
}
