use async_trait::async_trait;
use sqlx::PgPool;

use super::ReferenceLookup;
use crate::error::{ReferenceKind, Result, StorageError};
use crate::models::{Category, TrainingCenter};

#[derive(Clone)]
pub struct ReferenceRepository {
    pool: PgPool,
}

impl ReferenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferenceLookup for ReferenceRepository {
    async fn find_category_by_name(&self, name: &str) -> Result<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT category_id, name
            FROM categories
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::ReferenceNotFound {
            kind: ReferenceKind::Category,
            name: name.to_string(),
        })
    }

    async fn find_training_center_by_name(&self, name: &str) -> Result<TrainingCenter> {
        sqlx::query_as::<_, TrainingCenter>(
            r#"
            SELECT training_center_id, name, address, owner
            FROM training_centers
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::ReferenceNotFound {
            kind: ReferenceKind::TrainingCenter,
            name: name.to_string(),
        })
    }
}
