//! Track repository for database operations

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::{Playlist, Track};

/// Track repository
#[derive(Clone)]
pub struct TrackRepository {
    pool: PgPool,
}

impl TrackRepository {
    /// Create a new track repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all tracks
    pub async fn list_all(&self) -> ApiResult<Vec<Track>> {
        let tracks = sqlx::query_as::<_, Track>(
            r#"
            SELECT id, title, artist, album, duration_seconds, created_at, updated_at
            FROM tracks
            ORDER BY title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tracks)
    }

    /// Find a track by ID
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<Track>> {
        let track = sqlx::query_as::<_, Track>(
            r#"
            SELECT id, title, artist, album, duration_seconds, created_at, updated_at
            FROM tracks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(track)
    }

    /// List the playlists owned by a user that contain a track
    pub async fn playlists_containing(
        &self,
        track_id: Uuid,
        owner_id: Uuid,
    ) -> ApiResult<Vec<Playlist>> {
        let playlists = sqlx::query_as::<_, Playlist>(
            r#"
            SELECT p.id, p.name, p.description, p.owner_id, p.created_at, p.updated_at
            FROM playlists p
            JOIN playlist_tracks pt ON pt.playlist_id = p.id
            WHERE pt.track_id = $1 AND p.owner_id = $2
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(track_id)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(playlists)
    }
}
