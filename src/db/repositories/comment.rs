//! Comment repository

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Comment, CommentWithAuthor};

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persist a comment. `created` overrides the timestamp; now when absent.
    async fn create(
        &self,
        news_id: i64,
        author_id: i64,
        text: &str,
        created: Option<DateTime<Utc>>,
    ) -> Result<Comment>;

    /// Get a comment by id
    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>>;

    /// Comments under a news item, oldest first, joined with author names
    async fn list_by_news(&self, news_id: i64) -> Result<Vec<CommentWithAuthor>>;

    /// Replace a comment's text
    async fn update_text(&self, id: i64, text: &str) -> Result<bool>;

    /// Delete a comment
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Total number of stored comments
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based comment repository supporting SQLite and MySQL.
pub struct SqlxCommentRepository {
    pool: DynDatabasePool,
}

impl SqlxCommentRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(
        &self,
        news_id: i64,
        author_id: i64,
        text: &str,
        created: Option<DateTime<Utc>>,
    ) -> Result<Comment> {
        let created = created.unwrap_or_else(Utc::now);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_sqlite(self.pool.as_sqlite().expect("sqlite"), news_id, author_id, text, created).await
            }
            DatabaseDriver::Mysql => {
                create_mysql(self.pool.as_mysql().expect("mysql"), news_id, author_id, text, created).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_by_id_sqlite(self.pool.as_sqlite().expect("sqlite"), id).await
            }
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().expect("mysql"), id).await,
        }
    }

    async fn list_by_news(&self, news_id: i64) -> Result<Vec<CommentWithAuthor>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_by_news_sqlite(self.pool.as_sqlite().expect("sqlite"), news_id).await
            }
            DatabaseDriver::Mysql => {
                list_by_news_mysql(self.pool.as_mysql().expect("mysql"), news_id).await
            }
        }
    }

    async fn update_text(&self, id: i64, text: &str) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_text_sqlite(self.pool.as_sqlite().expect("sqlite"), id, text).await
            }
            DatabaseDriver::Mysql => {
                update_text_mysql(self.pool.as_mysql().expect("mysql"), id, text).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(self.pool.as_sqlite().expect("sqlite"), id).await,
            DatabaseDriver::Mysql => delete_mysql(self.pool.as_mysql().expect("mysql"), id).await,
        }
    }

    async fn count(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_sqlite(self.pool.as_sqlite().expect("sqlite")).await,
            DatabaseDriver::Mysql => count_mysql(self.pool.as_mysql().expect("mysql")).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

fn comment_from_sqlite_row(row: &sqlx::sqlite::SqliteRow) -> Comment {
    Comment {
        id: row.get("id"),
        news_id: row.get("news_id"),
        author_id: row.get("author_id"),
        text: row.get("text"),
        created: row.get("created"),
    }
}

async fn create_sqlite(
    pool: &SqlitePool,
    news_id: i64,
    author_id: i64,
    text: &str,
    created: DateTime<Utc>,
) -> Result<Comment> {
    let result =
        sqlx::query("INSERT INTO comments (news_id, author_id, text, created) VALUES (?, ?, ?, ?)")
            .bind(news_id)
            .bind(author_id)
            .bind(text)
            .bind(created)
            .execute(pool)
            .await?;

    Ok(Comment {
        id: result.last_insert_rowid(),
        news_id,
        author_id,
        text: text.to_string(),
        created,
    })
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Comment>> {
    let row = sqlx::query("SELECT id, news_id, author_id, text, created FROM comments WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| comment_from_sqlite_row(&r)))
}

async fn list_by_news_sqlite(pool: &SqlitePool, news_id: i64) -> Result<Vec<CommentWithAuthor>> {
    let rows = sqlx::query(
        r#"SELECT c.id, c.news_id, c.author_id, c.text, c.created, u.username
           FROM comments c
           JOIN users u ON c.author_id = u.id
           WHERE c.news_id = ?
           ORDER BY c.created ASC, c.id ASC"#,
    )
    .bind(news_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| CommentWithAuthor {
            id: row.get("id"),
            news_id: row.get("news_id"),
            author_id: row.get("author_id"),
            author: row.get("username"),
            text: row.get("text"),
            created: row.get("created"),
        })
        .collect())
}

async fn update_text_sqlite(pool: &SqlitePool, id: i64, text: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE comments SET text = ? WHERE id = ?")
        .bind(text)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn count_sqlite(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

// ============================================================================
// MySQL implementations
// ============================================================================

fn comment_from_mysql_row(row: &sqlx::mysql::MySqlRow) -> Comment {
    Comment {
        id: row.get("id"),
        news_id: row.get("news_id"),
        author_id: row.get("author_id"),
        text: row.get("text"),
        created: row.get("created"),
    }
}

async fn create_mysql(
    pool: &MySqlPool,
    news_id: i64,
    author_id: i64,
    text: &str,
    created: DateTime<Utc>,
) -> Result<Comment> {
    let result =
        sqlx::query("INSERT INTO comments (news_id, author_id, text, created) VALUES (?, ?, ?, ?)")
            .bind(news_id)
            .bind(author_id)
            .bind(text)
            .bind(created)
            .execute(pool)
            .await?;

    Ok(Comment {
        id: result.last_insert_id() as i64,
        news_id,
        author_id,
        text: text.to_string(),
        created,
    })
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Comment>> {
    let row = sqlx::query("SELECT id, news_id, author_id, text, created FROM comments WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| comment_from_mysql_row(&r)))
}

async fn list_by_news_mysql(pool: &MySqlPool, news_id: i64) -> Result<Vec<CommentWithAuthor>> {
    let rows = sqlx::query(
        r#"SELECT c.id, c.news_id, c.author_id, c.text, c.created, u.username
           FROM comments c
           JOIN users u ON c.author_id = u.id
           WHERE c.news_id = ?
           ORDER BY c.created ASC, c.id ASC"#,
    )
    .bind(news_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| CommentWithAuthor {
            id: row.get("id"),
            news_id: row.get("news_id"),
            author_id: row.get("author_id"),
            author: row.get("username"),
            text: row.get("text"),
            created: row.get("created"),
        })
        .collect())
}

async fn update_text_mysql(pool: &MySqlPool, id: i64, text: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE comments SET text = ? WHERE id = ?")
        .bind(text)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn count_mysql(pool: &MySqlPool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
