//! Driftmix Core
//!
//! Platform-agnostic domain types, validation rules, and error handling for
//! the Driftmix ambient sound mixer.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Playlist`, `Track`, `ActivePlaylist`, list query types
//! - **Storage Seam**: the [`PlaylistStore`] trait the UI and playback engine
//!   program against
//! - **Validation**: stateful name validators backing the rename/create dialogs
//! - **Error Handling**: Unified `DriftError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use drift_core::types::{CreatePlaylist, PlaylistSort, ListQuery};
//!
//! let create = CreatePlaylist::new("Rainy Evening", false, vec![
//!     "file:///sounds/rain.ogg".to_string(),
//!     "file:///sounds/thunder.ogg".to_string(),
//! ]);
//!
//! let query = ListQuery::new("rain", PlaylistSort::ActiveFirstNameAsc);
//! assert_eq!(query.filter, "rain");
//! # let _ = create;
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage;
pub mod types;
pub mod validate;

// Re-export commonly used types
pub use error::{DriftError, Result};
pub use storage::PlaylistStore;

// Export all types
pub use types::{
    ActivePlaylist, CreatePlaylist, ListQuery, Playlist, PlaylistSort, PlaylistSummary, Track,
};
pub use validate::{
    BatchNameError, BatchNameValidator, NameError, NewNameValidator, RenameValidator, TouchState,
};
