//! Note repository

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Note;

/// Note repository trait
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Persist a note and return it with its assigned id
    async fn create(&self, note: &Note) -> Result<Note>;

    /// Look a note up by slug, regardless of owner
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Note>>;

    /// All notes of one author, oldest first
    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Note>>;

    /// Rewrite a note's title, text and slug
    async fn update(&self, note: &Note) -> Result<bool>;

    /// Delete a note
    async fn delete(&self, id: i64) -> Result<bool>;

    /// How many notes carry the given slug (0 or 1 under the unique index)
    async fn count_by_slug(&self, slug: &str) -> Result<i64>;
}

/// SQLx-based note repository supporting SQLite and MySQL.
pub struct SqlxNoteRepository {
    pool: DynDatabasePool,
}

impl SqlxNoteRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn NoteRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl NoteRepository for SqlxNoteRepository {
    async fn create(&self, note: &Note) -> Result<Note> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.as_sqlite().expect("sqlite"), note).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.as_mysql().expect("mysql"), note).await,
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Note>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_by_slug_sqlite(self.pool.as_sqlite().expect("sqlite"), slug).await
            }
            DatabaseDriver::Mysql => {
                get_by_slug_mysql(self.pool.as_mysql().expect("mysql"), slug).await
            }
        }
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Note>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_by_author_sqlite(self.pool.as_sqlite().expect("sqlite"), author_id).await
            }
            DatabaseDriver::Mysql => {
                list_by_author_mysql(self.pool.as_mysql().expect("mysql"), author_id).await
            }
        }
    }

    async fn update(&self, note: &Note) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.pool.as_sqlite().expect("sqlite"), note).await,
            DatabaseDriver::Mysql => update_mysql(self.pool.as_mysql().expect("mysql"), note).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(self.pool.as_sqlite().expect("sqlite"), id).await,
            DatabaseDriver::Mysql => delete_mysql(self.pool.as_mysql().expect("mysql"), id).await,
        }
    }

    async fn count_by_slug(&self, slug: &str) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                count_by_slug_sqlite(self.pool.as_sqlite().expect("sqlite"), slug).await
            }
            DatabaseDriver::Mysql => {
                count_by_slug_mysql(self.pool.as_mysql().expect("mysql"), slug).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

fn note_from_sqlite_row(row: &sqlx::sqlite::SqliteRow) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        text: row.get("text"),
        slug: row.get("slug"),
        author_id: row.get("author_id"),
    }
}

async fn create_sqlite(pool: &SqlitePool, note: &Note) -> Result<Note> {
    let result =
        sqlx::query("INSERT INTO notes (title, text, slug, author_id) VALUES (?, ?, ?, ?)")
            .bind(&note.title)
            .bind(&note.text)
            .bind(&note.slug)
            .bind(note.author_id)
            .execute(pool)
            .await?;

    let mut created = note.clone();
    created.id = result.last_insert_rowid();
    Ok(created)
}

async fn get_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<Option<Note>> {
    let row = sqlx::query("SELECT id, title, text, slug, author_id FROM notes WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| note_from_sqlite_row(&r)))
}

async fn list_by_author_sqlite(pool: &SqlitePool, author_id: i64) -> Result<Vec<Note>> {
    let rows = sqlx::query(
        "SELECT id, title, text, slug, author_id FROM notes WHERE author_id = ? ORDER BY id ASC",
    )
    .bind(author_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(note_from_sqlite_row).collect())
}

async fn update_sqlite(pool: &SqlitePool, note: &Note) -> Result<bool> {
    let result = sqlx::query("UPDATE notes SET title = ?, text = ?, slug = ? WHERE id = ?")
        .bind(&note.title)
        .bind(&note.text)
        .bind(&note.slug)
        .bind(note.id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM notes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn count_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE slug = ?")
        .bind(slug)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

// ============================================================================
// MySQL implementations
// ============================================================================

fn note_from_mysql_row(row: &sqlx::mysql::MySqlRow) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        text: row.get("text"),
        slug: row.get("slug"),
        author_id: row.get("author_id"),
    }
}

async fn create_mysql(pool: &MySqlPool, note: &Note) -> Result<Note> {
    let result =
        sqlx::query("INSERT INTO notes (title, text, slug, author_id) VALUES (?, ?, ?, ?)")
            .bind(&note.title)
            .bind(&note.text)
            .bind(&note.slug)
            .bind(note.author_id)
            .execute(pool)
            .await?;

    let mut created = note.clone();
    created.id = result.last_insert_id() as i64;
    Ok(created)
}

async fn get_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<Option<Note>> {
    let row = sqlx::query("SELECT id, title, text, slug, author_id FROM notes WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| note_from_mysql_row(&r)))
}

async fn list_by_author_mysql(pool: &MySqlPool, author_id: i64) -> Result<Vec<Note>> {
    let rows = sqlx::query(
        "SELECT id, title, text, slug, author_id FROM notes WHERE author_id = ? ORDER BY id ASC",
    )
    .bind(author_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(note_from_mysql_row).collect())
}

async fn update_mysql(pool: &MySqlPool, note: &Note) -> Result<bool> {
    let result = sqlx::query("UPDATE notes SET title = ?, text = ?, slug = ? WHERE id = ?")
        .bind(&note.title)
        .bind(&note.text)
        .bind(&note.slug)
        .bind(note.id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM notes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn count_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE slug = ?")
        .bind(slug)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
