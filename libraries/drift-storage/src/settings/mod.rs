//! Preference storage
//!
//! Key-value storage for the playlist screen's sort order and display
//! options. Values are JSON-serialized for flexibility.
//!
//! # Example
//!
//! ```rust,no_run
//! use drift_storage::settings;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! settings::set_setting(pool, settings::SETTING_PLAYLIST_SORT, &serde_json::json!("name_asc"))
//!     .await?;
//!
//! let sort = settings::get_setting(pool, settings::SETTING_PLAYLIST_SORT).await?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

use crate::error::Result;

// Setting key constants
/// Playlist listing sort order (a `PlaylistSort` string form)
pub const SETTING_PLAYLIST_SORT: &str = "ui.playlist_sort";

/// Whether the listing uses the compact row layout
pub const SETTING_COMPACT_LIST: &str = "ui.compact_list";

/// Whether single-track playlists show their quick-add badge
pub const SETTING_SHOW_QUICK_ADD_BADGE: &str = "ui.show_quick_add_badge";

/// Setting entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    /// Setting key
    pub key: String,
    /// Setting value (JSON)
    pub value: serde_json::Value,
}

/// Get a single setting value
///
/// Returns `Ok(Some(value))` if the setting exists, `Ok(None)` if not found.
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<serde_json::Value>> {
    let raw: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    raw.map(|value| serde_json::from_str(&value).map_err(Into::into))
        .transpose()
}

/// Set a setting value (insert or update)
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &serde_json::Value) -> Result<()> {
    let raw = serde_json::to_string(value)?;

    sqlx::query(
        "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, unixepoch())
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(raw)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get every stored setting
pub async fn get_all_settings(pool: &SqlitePool) -> Result<Vec<Setting>> {
    let rows = sqlx::query("SELECT key, value FROM settings ORDER BY key")
        .fetch_all(pool)
        .await?;

    rows.into_iter()
        .map(|row| {
            let raw: String = row.get("value");
            Ok(Setting {
                key: row.get("key"),
                value: serde_json::from_str(&raw)?,
            })
        })
        .collect()
}

/// Remove a setting
pub async fn delete_setting(pool: &SqlitePool, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM settings WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(())
}
