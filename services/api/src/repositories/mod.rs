//! Repositories for database operations

pub mod playlist;
pub mod track;
pub mod user;

pub use playlist::PlaylistRepository;
pub use track::TrackRepository;
pub use user::UserRepository;
