//! PostgreSQL store. Foreign keys carry `ON DELETE CASCADE`, so deletes are a single statement.

use super::CatalogStore;
use crate::error::{AppError, ConfigError};
use crate::models::*;
use async_trait::async_trait;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

const BOOK_COLUMNS: &str = "id, title, author_id, publisher_id, publication_date, post_photo";
const COMMENT_COLUMNS: &str = "id, book_id, author, text, created_date";

/// Tables in dependency order. Idempotent.
const CATALOG_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS publishers (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(30) NOT NULL,
        address VARCHAR(50) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS authors (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(30) NOT NULL,
        email VARCHAR(254) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS books (
        id BIGSERIAL PRIMARY KEY,
        title VARCHAR(100) NOT NULL,
        author_id BIGINT NOT NULL REFERENCES authors (id) ON DELETE CASCADE,
        publisher_id BIGINT NOT NULL REFERENCES publishers (id) ON DELETE CASCADE,
        publication_date DATE NOT NULL,
        post_photo VARCHAR(100)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        id BIGSERIAL PRIMARY KEY,
        book_id BIGINT NOT NULL REFERENCES books (id) ON DELETE CASCADE,
        author VARCHAR(200) NOT NULL,
        text TEXT NOT NULL,
        created_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS books_publication_date_idx ON books (publication_date DESC, id DESC)",
    "CREATE INDEX IF NOT EXISTS comments_book_created_idx ON comments (book_id, created_date DESC, id DESC)",
];

/// Create the catalog tables and indexes if they do not exist.
pub async fn ensure_catalog_tables(pool: &PgPool) -> Result<(), AppError> {
    for ddl in CATALOG_DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url).map_err(|e| ConfigError::Invalid {
        name: "DATABASE_URL",
        reason: e.to_string(),
    })?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let path_start = url.rfind('/').ok_or_else(|| ConfigError::Invalid {
        name: "DATABASE_URL",
        reason: "no database path".into(),
    })? + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Map a foreign-key violation (SQLSTATE 23503) to a conflict; everything else stays a database error.
fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some("23503") {
            return AppError::Conflict(db.message().to_string());
        }
    }
    AppError::Db(e)
}

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        PgCatalogStore { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn list_publishers(&self) -> Result<Vec<Publisher>, AppError> {
        let rows = sqlx::query_as::<_, Publisher>("SELECT id, name, address FROM publishers ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_publisher(&self, id: PublisherId) -> Result<Option<Publisher>, AppError> {
        let row = sqlx::query_as::<_, Publisher>("SELECT id, name, address FROM publishers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_publisher(&self, new: &NewPublisher) -> Result<Publisher, AppError> {
        let row = sqlx::query_as::<_, Publisher>(
            "INSERT INTO publishers (name, address) VALUES ($1, $2) RETURNING id, name, address",
        )
        .bind(&new.name)
        .bind(&new.address)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_publisher(&self, id: PublisherId) -> Result<bool, AppError> {
        let done = sqlx::query("DELETE FROM publishers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn list_authors(&self) -> Result<Vec<Author>, AppError> {
        let rows = sqlx::query_as::<_, Author>("SELECT id, name, email FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_author(&self, id: AuthorId) -> Result<Option<Author>, AppError> {
        let row = sqlx::query_as::<_, Author>("SELECT id, name, email FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_author(&self, new: &NewAuthor) -> Result<Author, AppError> {
        let row = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (name, email) VALUES ($1, $2) RETURNING id, name, email",
        )
        .bind(&new.name)
        .bind(&new.email)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_author(&self, id: AuthorId) -> Result<bool, AppError> {
        let done = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn list_books(&self) -> Result<Vec<Book>, AppError> {
        let sql = format!(
            "SELECT {} FROM books ORDER BY publication_date DESC, id DESC",
            BOOK_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Book>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get_book(&self, id: BookId) -> Result<Option<Book>, AppError> {
        let sql = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);
        let row = sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_book(&self, new: &NewBook) -> Result<Book, AppError> {
        let sql = format!(
            "INSERT INTO books (title, author_id, publisher_id, publication_date, post_photo) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            BOOK_COLUMNS
        );
        sqlx::query_as::<_, Book>(&sql)
            .bind(&new.title)
            .bind(new.author_id)
            .bind(new.publisher_id)
            .bind(new.publication_date)
            .bind(&new.post_photo)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn update_book(&self, id: BookId, new: &NewBook) -> Result<Option<Book>, AppError> {
        let sql = format!(
            "UPDATE books SET title = $1, author_id = $2, publisher_id = $3, publication_date = $4, post_photo = $5 \
             WHERE id = $6 RETURNING {}",
            BOOK_COLUMNS
        );
        sqlx::query_as::<_, Book>(&sql)
            .bind(&new.title)
            .bind(new.author_id)
            .bind(new.publisher_id)
            .bind(new.publication_date)
            .bind(&new.post_photo)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn delete_book(&self, id: BookId) -> Result<bool, AppError> {
        let done = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn comments_for_book(&self, book_id: BookId) -> Result<Vec<Comment>, AppError> {
        let sql = format!(
            "SELECT {} FROM comments WHERE book_id = $1 ORDER BY created_date DESC, id DESC",
            COMMENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, Comment>(&sql)
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>, AppError> {
        let sql = format!("SELECT {} FROM comments WHERE id = $1", COMMENT_COLUMNS);
        let row = sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_comment(&self, new: &NewComment) -> Result<Comment, AppError> {
        let sql = format!(
            "INSERT INTO comments (book_id, author, text) VALUES ($1, $2, $3) RETURNING {}",
            COMMENT_COLUMNS
        );
        sqlx::query_as::<_, Comment>(&sql)
            .bind(new.book_id)
            .bind(&new.author)
            .bind(&new.text)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn update_comment_text(&self, id: CommentId, text: &str) -> Result<Option<Comment>, AppError> {
        let sql = format!("UPDATE comments SET text = $1 WHERE id = $2 RETURNING {}", COMMENT_COLUMNS);
        let row = sqlx::query_as::<_, Comment>(&sql)
            .bind(text)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
