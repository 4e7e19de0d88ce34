//! Application state shared across handlers

use sqlx::PgPool;

use crate::jwt::JwtService;
use crate::repositories::{PlaylistRepository, TrackRepository, UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub playlist_repository: PlaylistRepository,
    pub track_repository: TrackRepository,
}

impl AppState {
    /// Build the application state from a pool and a JWT service
    pub fn new(pool: PgPool, jwt_service: JwtService) -> Self {
        Self {
            jwt_service,
            user_repository: UserRepository::new(pool.clone()),
            playlist_repository: PlaylistRepository::new(pool.clone()),
            track_repository: TrackRepository::new(pool),
        }
    }
}
