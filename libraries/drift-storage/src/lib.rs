//! Driftmix Storage
//!
//! `SQLite` database layer for the Driftmix ambient sound mixer.
//!
//! This crate persists playlists, their member tracks, and the ordered
//! membership relation between them, and exposes both one-shot queries and
//! live `watch`-channel subscriptions that re-emit after every committed
//! mutation.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each feature owns its own queries and logic
//!   (`playlists`, `tracks`, `settings`)
//! - **Transactional Mutations**: every multi-step write runs inside one
//!   transaction; readers see pre- or post-state, never an intermediate one
//! - **Reactive Reads**: [`observe`] re-runs queries on a change signal bumped
//!   by [`context::MixerStore`] after each commit
//!
//! # Example
//!
//! ```rust,no_run
//! use drift_storage::{create_pool, run_migrations, MixerStore};
//! use drift_core::storage::PlaylistStore;
//! use drift_core::types::CreatePlaylist;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://drift.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = MixerStore::new(pool);
//! store
//!     .create_playlist(CreatePlaylist::new("Rain", false, vec![
//!         "file:///sounds/rain.ogg".to_string(),
//!     ]))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod playlists;
pub mod settings;
pub mod tracks;

// Reactive subscriptions
pub mod observe;

pub use context::MixerStore;
pub use error::StorageError;
pub use observe::ChangeNotifier;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://drift.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        // Cascade rules in the schema require enforcement
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
