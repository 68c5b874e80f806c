use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};

use crate::{
    error::Result,
    models::{Idea, NewIdea},
};

/// Keyed table of idea records.
#[async_trait]
pub trait IdeaStore: Send + Sync {
    async fn insert(&self, idea: NewIdea) -> Result<i64>;
    async fn get(&self, id: i64) -> Result<Option<Idea>>;
    async fn set_published_markup(&self, id: i64, markup: &str) -> Result<()>;
    /// Newest first
    async fn list(&self) -> Result<Vec<Idea>>;
}

#[derive(FromRow)]
struct IdeaRow {
    id: i64,
    source_url: String,
    competitor_name: String,
    weaknesses: Json<Vec<String>>,
    published_markup: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<IdeaRow> for Idea {
    fn from(row: IdeaRow) -> Self {
        Idea {
            id: row.id,
            source_url: row.source_url,
            competitor_name: row.competitor_name,
            weaknesses: row.weaknesses.0,
            published_markup: row.published_markup,
            created_at: row.created_at,
        }
    }
}

pub struct PgIdeaStore {
    db: PgPool,
}

impl PgIdeaStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdeaStore for PgIdeaStore {
    async fn insert(&self, idea: NewIdea) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO ideas (source_url, competitor_name, weaknesses)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&idea.source_url)
        .bind(&idea.competitor_name)
        .bind(Json(&idea.weaknesses))
        .fetch_one(&self.db)
        .await?;

        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<Idea>> {
        let row: Option<IdeaRow> = sqlx::query_as(
            r#"
            SELECT id, source_url, competitor_name, weaknesses, published_markup, created_at
            FROM ideas WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Idea::from))
    }

    async fn set_published_markup(&self, id: i64, markup: &str) -> Result<()> {
        // last write wins; concurrent publications of one id are not serialized
        sqlx::query("UPDATE ideas SET published_markup = $1 WHERE id = $2")
            .bind(markup)
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Idea>> {
        let rows: Vec<IdeaRow> = sqlx::query_as(
            r#"
            SELECT id, source_url, competitor_name, weaknesses, published_markup, created_at
            FROM ideas ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Idea::from).collect())
    }
}
