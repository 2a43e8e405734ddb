//! `PostgreSQL` implementation of the `PromptRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use carbot_core::error::StoreError;
use carbot_core::prompt::{Category, Prompt, PromptId};
use carbot_core::repository::PromptRepository;

/// PostgreSQL-backed prompt repository. Identifier assignment and
/// per-operation atomicity come from the database itself (`BIGSERIAL`
/// ids, single-statement operations).
#[derive(Debug, Clone)]
pub struct PgPromptRepository {
    pool: PgPool,
}

impl PgPromptRepository {
    /// Creates a repository over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[derive(Debug, sqlx::FromRow)]
struct PromptRow {
    id: i64,
    category: String,
    text: String,
    created_at: DateTime<Utc>,
}

impl PromptRow {
    fn into_prompt(self) -> Result<Prompt, StoreError> {
        let category = Category::from_name(&self.category).ok_or_else(|| {
            StoreError::Corrupt(format!("unknown category {:?} for prompt {}", self.category, self.id))
        })?;
        Ok(Prompt {
            id: PromptId(self.id),
            category,
            text: self.text,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl PromptRepository for PgPromptRepository {
    async fn list(&self, category: Category) -> Result<Vec<Prompt>, StoreError> {
        let rows = sqlx::query_as::<_, PromptRow>(
            "SELECT id, category, text, created_at FROM prompts \
             WHERE category = $1 ORDER BY id",
        )
        .bind(category.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.into_iter().map(PromptRow::into_prompt).collect()
    }

    async fn append(
        &self,
        category: Category,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Prompt, StoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO prompts (category, text, created_at) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(category.as_str())
        .bind(text)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;

        Ok(Prompt {
            id: PromptId(id),
            category,
            text: text.to_owned(),
            created_at,
        })
    }

    async fn delete(&self, id: PromptId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM prompts WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        Ok(result.rows_affected() > 0)
    }
}
