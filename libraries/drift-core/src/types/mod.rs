mod playlist;
mod track;

pub use playlist::{
    ActivePlaylist, CreatePlaylist, ListQuery, Playlist, PlaylistSort, PlaylistSummary,
};
pub use track::Track;
