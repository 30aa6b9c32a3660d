use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::AthleteStore;
use crate::dto::athlete::{ListAthletesQuery, UpdateAthleteRequest};
use crate::error::{Result, StorageError, UniqueKey};
use crate::models::{Athlete, AthleteRecord, AthleteSummary};

const CPF_CONSTRAINT: &str = "athletes_cpf_key";
const PUBLIC_ID_CONSTRAINT: &str = "athletes_athlete_id_key";

#[derive(Clone)]
pub struct AthleteRepository {
    pool: PgPool,
}

impl AthleteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AthleteStore for AthleteRepository {
    async fn insert(&self, athlete: &Athlete) -> Result<AthleteRecord> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, AthleteRecord>(
            r#"
            WITH inserted AS (
                INSERT INTO athletes (athlete_id, name, cpf, age, weight, height, sex,
                                      created_at, category_id, training_center_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING athlete_id, name, cpf, age, weight, height, sex,
                          created_at, category_id, training_center_id
            )
            SELECT a.athlete_id, a.name, a.cpf, a.age, a.weight, a.height, a.sex,
                   a.created_at, a.category_id, a.training_center_id,
                   c.name AS category_name, t.name AS training_center_name
            FROM inserted a
            JOIN categories c ON c.category_id = a.category_id
            JOIN training_centers t ON t.training_center_id = a.training_center_id
            "#,
        )
        .bind(athlete.athlete_id)
        .bind(&athlete.name)
        .bind(&athlete.cpf)
        .bind(athlete.age)
        .bind(athlete.weight)
        .bind(athlete.height)
        .bind(athlete.sex)
        .bind(athlete.created_at)
        .bind(athlete.category_id)
        .bind(athlete.training_center_id)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(record) => {
                tx.commit().await.map_err(|e| {
                    classify_write_error(e.into(), Some(&athlete.cpf), athlete.athlete_id)
                })?;
                Ok(record)
            }
            Err(e) => {
                rollback(tx).await;
                Err(classify_write_error(
                    e.into(),
                    Some(&athlete.cpf),
                    athlete.athlete_id,
                ))
            }
        }
    }

    async fn find_by_public_id(&self, id: Uuid) -> Result<AthleteRecord> {
        let record = sqlx::query_as::<_, AthleteRecord>(
            r#"
            SELECT a.athlete_id, a.name, a.cpf, a.age, a.weight, a.height, a.sex,
                   a.created_at, a.category_id, a.training_center_id,
                   c.name AS category_name, t.name AS training_center_name
            FROM athletes a
            JOIN categories c ON c.category_id = a.category_id
            JOIN training_centers t ON t.training_center_id = a.training_center_id
            WHERE a.athlete_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(record)
    }

    async fn list(&self, query: &ListAthletesQuery) -> Result<(Vec<AthleteSummary>, i64)> {
        let pagination = query.pagination();

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM athletes a WHERE 1=1");
        push_filters(&mut count, query);
        let total_items = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut select = QueryBuilder::new(
            r#"
            SELECT a.name, c.name AS category_name, t.name AS training_center_name
            FROM athletes a
            JOIN categories c ON c.category_id = a.category_id
            JOIN training_centers t ON t.training_center_id = a.training_center_id
            WHERE 1=1
            "#,
        );
        push_filters(&mut select, query);
        select.push(" ORDER BY a.name, a.created_at LIMIT ");
        select.push_bind(i64::from(pagination.limit()));
        select.push(" OFFSET ");
        select.push_bind(i64::try_from(pagination.offset()).unwrap_or(i64::MAX));

        let athletes = select
            .build_query_as::<AthleteSummary>()
            .fetch_all(&self.pool)
            .await?;

        Ok((athletes, total_items))
    }

    async fn update(&self, id: Uuid, changes: &UpdateAthleteRequest) -> Result<AthleteRecord> {
        let mut tx = self.pool.begin().await?;

        // Absent fields bind NULL and keep the column's current value
        let updated = sqlx::query_as::<_, AthleteRecord>(
            r#"
            WITH updated AS (
                UPDATE athletes
                SET name = COALESCE($2, name),
                    cpf = COALESCE($3, cpf),
                    age = COALESCE($4, age),
                    weight = COALESCE($5, weight),
                    height = COALESCE($6, height),
                    sex = COALESCE($7, sex)
                WHERE athlete_id = $1
                RETURNING athlete_id, name, cpf, age, weight, height, sex,
                          created_at, category_id, training_center_id
            )
            SELECT a.athlete_id, a.name, a.cpf, a.age, a.weight, a.height, a.sex,
                   a.created_at, a.category_id, a.training_center_id,
                   c.name AS category_name, t.name AS training_center_name
            FROM updated a
            JOIN categories c ON c.category_id = a.category_id
            JOIN training_centers t ON t.training_center_id = a.training_center_id
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.cpf.as_deref())
        .bind(changes.age)
        .bind(changes.weight)
        .bind(changes.height)
        .bind(changes.sex)
        .fetch_optional(&mut *tx)
        .await;

        let cpf = changes.cpf.as_deref();
        match updated {
            Ok(Some(record)) => {
                tx.commit()
                    .await
                    .map_err(|e| classify_write_error(e.into(), cpf, id))?;
                Ok(record)
            }
            Ok(None) => {
                rollback(tx).await;
                Err(StorageError::NotFound)
            }
            Err(e) => {
                rollback(tx).await;
                Err(classify_write_error(e.into(), cpf, id))
            }
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM athletes WHERE athlete_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ListAthletesQuery) {
    if let Some(name) = query.name_filter() {
        builder.push(" AND a.name ILIKE ");
        builder.push_bind(format!("%{}%", escape_like(name)));
    }

    if let Some(cpf) = query.cpf_filter() {
        builder.push(" AND a.cpf = ");
        builder.push_bind(cpf.to_string());
    }
}

/// Escapes LIKE wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

async fn rollback(tx: Transaction<'_, Postgres>) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!("Failed to roll back athlete transaction: {}", e);
    }
}

/// Maps constraint failures of a write on athlete `id`; `cpf` is the value
/// the write tried to store, if any
fn classify_write_error(error: StorageError, cpf: Option<&str>, id: Uuid) -> StorageError {
    if error.is_unique_violation() {
        let key = match error.constraint() {
            Some(CPF_CONSTRAINT) => UniqueKey::Cpf,
            Some(PUBLIC_ID_CONSTRAINT) => UniqueKey::PublicId,
            other => UniqueKey::Other(other.unwrap_or("unknown").to_string()),
        };
        let value = match (&key, cpf) {
            (UniqueKey::Cpf, Some(cpf)) => cpf.to_string(),
            _ => id.to_string(),
        };
        return StorageError::DuplicateKey { key, value };
    }

    if error.is_foreign_key_violation() {
        return StorageError::ConstraintViolation(
            "Referenced category or training center no longer exists".to_string(),
        );
    }

    error
}
