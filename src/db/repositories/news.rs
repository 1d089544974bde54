//! News repository

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{CreateNewsInput, News};

/// News repository trait
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Persist a news item
    async fn create(&self, input: &CreateNewsInput) -> Result<News>;

    /// Get a news item by id
    async fn get_by_id(&self, id: i64) -> Result<Option<News>>;

    /// Newest news first, at most `limit` items
    async fn list_recent(&self, limit: i64) -> Result<Vec<News>>;
}

/// SQLx-based news repository supporting SQLite and MySQL.
pub struct SqlxNewsRepository {
    pool: DynDatabasePool,
}

impl SqlxNewsRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn NewsRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl NewsRepository for SqlxNewsRepository {
    async fn create(&self, input: &CreateNewsInput) -> Result<News> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_sqlite(self.pool.as_sqlite().expect("sqlite"), input).await
            }
            DatabaseDriver::Mysql => create_mysql(self.pool.as_mysql().expect("mysql"), input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<News>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_by_id_sqlite(self.pool.as_sqlite().expect("sqlite"), id).await
            }
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().expect("mysql"), id).await,
        }
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<News>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_recent_sqlite(self.pool.as_sqlite().expect("sqlite"), limit).await
            }
            DatabaseDriver::Mysql => {
                list_recent_mysql(self.pool.as_mysql().expect("mysql"), limit).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

fn news_from_sqlite_row(row: &sqlx::sqlite::SqliteRow) -> News {
    News {
        id: row.get("id"),
        title: row.get("title"),
        text: row.get("text"),
        date: row.get("date"),
    }
}

async fn create_sqlite(pool: &SqlitePool, input: &CreateNewsInput) -> Result<News> {
    let date = input.date_or_today();
    let result = sqlx::query("INSERT INTO news (title, text, date) VALUES (?, ?, ?)")
        .bind(&input.title)
        .bind(&input.text)
        .bind(date)
        .execute(pool)
        .await?;

    Ok(News {
        id: result.last_insert_rowid(),
        title: input.title.clone(),
        text: input.text.clone(),
        date,
    })
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<News>> {
    let row = sqlx::query("SELECT id, title, text, date FROM news WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| news_from_sqlite_row(&r)))
}

async fn list_recent_sqlite(pool: &SqlitePool, limit: i64) -> Result<Vec<News>> {
    let rows = sqlx::query("SELECT id, title, text, date FROM news ORDER BY date DESC, id DESC LIMIT ?")
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(news_from_sqlite_row).collect())
}

// ============================================================================
// MySQL implementations
// ============================================================================

fn news_from_mysql_row(row: &sqlx::mysql::MySqlRow) -> News {
    News {
        id: row.get("id"),
        title: row.get("title"),
        text: row.get("text"),
        date: row.get("date"),
    }
}

async fn create_mysql(pool: &MySqlPool, input: &CreateNewsInput) -> Result<News> {
    let date = input.date_or_today();
    let result = sqlx::query("INSERT INTO news (title, text, date) VALUES (?, ?, ?)")
        .bind(&input.title)
        .bind(&input.text)
        .bind(date)
        .execute(pool)
        .await?;

    Ok(News {
        id: result.last_insert_id() as i64,
        title: input.title.clone(),
        text: input.text.clone(),
        date,
    })
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<News>> {
    let row = sqlx::query("SELECT id, title, text, date FROM news WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| news_from_mysql_row(&r)))
}

async fn list_recent_mysql(pool: &MySqlPool, limit: i64) -> Result<Vec<News>> {
    let rows = sqlx::query("SELECT id, title, text, date FROM news ORDER BY date DESC, id DESC LIMIT ?")
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(news_from_mysql_row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use chrono::NaiveDate;

    async fn setup() -> SqlxNewsRepository {
        let pool = create_test_pool().await.expect("pool");
        migrations::run_migrations(&pool).await.expect("migrations");
        SqlxNewsRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let repo = setup().await;
        let created = repo
            .create(&CreateNewsInput::new("Headline", "Body"))
            .await
            .expect("create");

        let found = repo.get_by_id(created.id).await.expect("query").expect("found");
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_list_recent_orders_newest_first() {
        let repo = setup().await;
        let day = |d| NaiveDate::from_ymd_opt(2024, 10, d).unwrap();

        let oldest = repo
            .create(&CreateNewsInput::dated("Oldest", "t", day(1)))
            .await
            .expect("create");
        let newest = repo
            .create(&CreateNewsInput::dated("Newest", "t", day(3)))
            .await
            .expect("create");
        let middle = repo
            .create(&CreateNewsInput::dated("Middle", "t", day(2)))
            .await
            .expect("create");

        let listed = repo.list_recent(10).await.expect("list");
        assert_eq!(listed, vec![newest, middle, oldest]);
    }

    #[tokio::test]
    async fn test_list_recent_respects_limit() {
        let repo = setup().await;
        for i in 0..5 {
            repo.create(&CreateNewsInput::new(format!("News {}", i), "t"))
                .await
                .expect("create");
        }

        let listed = repo.list_recent(3).await.expect("list");
        assert_eq!(listed.len(), 3);
    }
}
