//! Playlist repository for database operations

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{CreatePlaylistRequest, Playlist, PlaylistDetail, Track};

/// Playlist repository
#[derive(Clone)]
pub struct PlaylistRepository {
    pool: PgPool,
}

impl PlaylistRepository {
    /// Create a new playlist repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the playlists owned by a user
    pub async fn list_by_owner(&self, owner_id: Uuid) -> ApiResult<Vec<Playlist>> {
        let playlists = sqlx::query_as::<_, Playlist>(
            r#"
            SELECT id, name, description, owner_id, created_at, updated_at
            FROM playlists
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(playlists)
    }

    /// Create a playlist owned by a user and associate the given tracks
    ///
    /// The playlist row and its track associations are written in one
    /// transaction; a nonexistent track id aborts the whole create.
    pub async fn create(
        &self,
        owner_id: Uuid,
        payload: &CreatePlaylistRequest,
    ) -> ApiResult<Playlist> {
        info!("Creating playlist '{}' for user {}", payload.name, owner_id);

        let mut tx = self.pool.begin().await?;

        let playlist = sqlx::query_as::<_, Playlist>(
            r#"
            INSERT INTO playlists (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        for track_id in &payload.track_ids {
            let result = sqlx::query(
                r#"
                INSERT INTO playlist_tracks (playlist_id, track_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(playlist.id)
            .bind(track_id)
            .execute(&mut *tx)
            .await;

            match result {
                Ok(_) => {}
                Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                    return Err(ApiError::BadRequest(
                        "One or more tracks do not exist.".to_string(),
                    ));
                }
                Err(e) => return Err(e.into()),
            }
        }

        tx.commit().await?;

        Ok(playlist)
    }

    /// Find a playlist by ID together with its tracks
    pub async fn find_with_tracks(&self, id: Uuid) -> ApiResult<Option<PlaylistDetail>> {
        let playlist = sqlx::query_as::<_, Playlist>(
            r#"
            SELECT id, name, description, owner_id, created_at, updated_at
            FROM playlists
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(playlist) = playlist else {
            return Ok(None);
        };

        let tracks = sqlx::query_as::<_, Track>(
            r#"
            SELECT t.id, t.title, t.artist, t.album, t.duration_seconds,
                   t.created_at, t.updated_at
            FROM tracks t
            JOIN playlist_tracks pt ON pt.track_id = t.id
            WHERE pt.playlist_id = $1
            ORDER BY t.title
            "#,
        )
        .bind(playlist.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(PlaylistDetail { playlist, tracks }))
    }
}
