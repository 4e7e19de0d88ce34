//! API service models

pub mod playlist;
pub mod track;
pub mod user;

// Re-export for convenience
pub use playlist::{CreatePlaylistRequest, Playlist, PlaylistDetail};
pub use track::{Track, TrackDetail};
pub use user::{LoginRequest, RegisterRequest, TokenResponse, User};
