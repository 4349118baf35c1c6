use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::Result;
use crate::features::photos::models::Photo;

/// Keyed document store for photo records.
///
/// `save` has upsert semantics: a record with an existing id overwrites the
/// stored one.
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn save(&self, photo: Photo) -> Result<Photo>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Photo>>;
}

/// Postgres-backed photo repository
pub struct PgPhotoRepository {
    pool: PgPool,
}

impl PgPhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotoRepository for PgPhotoRepository {
    async fn save(&self, photo: Photo) -> Result<Photo> {
        let saved = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (id, uri, label)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET uri = EXCLUDED.uri, label = EXCLUDED.label
            RETURNING id, uri, label
            "#,
        )
        .bind(&photo.id)
        .bind(&photo.uri)
        .bind(&photo.label)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Photo>> {
        let photo = sqlx::query_as::<_, Photo>(
            r#"
            SELECT id, uri, label FROM photos WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(photo)
    }
}
