use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::ThoughtStore;
use crate::{
    error::StoreResult,
    models::{NewThought, Thought},
};

const SCHEMA: [&str; 2] = [
    "
    CREATE TABLE IF NOT EXISTS thoughts (
        id          UUID PRIMARY KEY,
        message     TEXT NOT NULL,
        hearts      INTEGER NOT NULL DEFAULT 0,
        liked_users UUID[] NOT NULL DEFAULT '{}',
        created_at  TIMESTAMPTZ NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS thoughts_created_at_idx ON thoughts (created_at DESC)",
];

/// PostgreSQL implementation of [`ThoughtStore`]
#[derive(Clone)]
pub struct PgThoughtStore {
    pool: PgPool,
}

impl PgThoughtStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `thoughts` table and its index if they do not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ThoughtStore for PgThoughtStore {
    async fn recent(&self, limit: usize) -> StoreResult<Vec<Thought>> {
        let thoughts = sqlx::query_as::<_, Thought>(
            "
            SELECT id, message, hearts, liked_users, created_at
            FROM thoughts
            ORDER BY created_at DESC
            LIMIT $1
            ",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(thoughts)
    }

    async fn insert(&self, thought: NewThought) -> StoreResult<Thought> {
        let thought = sqlx::query_as::<_, Thought>(
            "
            INSERT INTO thoughts (id, message, hearts, liked_users, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, message, hearts, liked_users, created_at
            ",
        )
        .bind(Uuid::new_v4())
        .bind(&thought.message)
        .bind(thought.hearts)
        .bind(&thought.liked_users)
        .bind(thought.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(thought)
    }

    async fn toggle_hearts(&self, id: Uuid) -> StoreResult<Option<Thought>> {
        // parity is evaluated by the database so concurrent toggles cannot lose an update
        let thought = sqlx::query_as::<_, Thought>(
            "
            UPDATE thoughts
            SET hearts = CASE WHEN hearts % 2 = 0 THEN hearts + 1 ELSE hearts - 1 END
            WHERE id = $1
            RETURNING id, message, hearts, liked_users, created_at
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(thought)
    }
}
