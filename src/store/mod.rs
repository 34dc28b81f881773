//! Catalog persistence. `PgCatalogStore` is the production store; `MemoryCatalogStore`
//! backs tests and database-less local runs.

mod memory;
mod postgres;

pub use memory::MemoryCatalogStore;
pub use postgres::{ensure_catalog_tables, ensure_database_exists, PgCatalogStore};

use crate::error::AppError;
use crate::models::*;
use async_trait::async_trait;

/// Row-level operations the service needs. Each mutating call is one logical write;
/// deleting a parent removes its dependants in the same write.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Cheap round trip used by readiness checks.
    async fn ping(&self) -> Result<(), AppError>;

    async fn list_publishers(&self) -> Result<Vec<Publisher>, AppError>;
    async fn get_publisher(&self, id: PublisherId) -> Result<Option<Publisher>, AppError>;
    async fn insert_publisher(&self, new: &NewPublisher) -> Result<Publisher, AppError>;
    /// Also deletes the publisher's books and their comments. Returns false if nothing matched.
    async fn delete_publisher(&self, id: PublisherId) -> Result<bool, AppError>;

    async fn list_authors(&self) -> Result<Vec<Author>, AppError>;
    async fn get_author(&self, id: AuthorId) -> Result<Option<Author>, AppError>;
    async fn insert_author(&self, new: &NewAuthor) -> Result<Author, AppError>;
    /// Also deletes the author's books and their comments. Returns false if nothing matched.
    async fn delete_author(&self, id: AuthorId) -> Result<bool, AppError>;

    /// Newest publication date first.
    async fn list_books(&self) -> Result<Vec<Book>, AppError>;
    async fn get_book(&self, id: BookId) -> Result<Option<Book>, AppError>;
    async fn insert_book(&self, new: &NewBook) -> Result<Book, AppError>;
    /// Replace the editable fields in place. `None` when the id does not exist.
    async fn update_book(&self, id: BookId, new: &NewBook) -> Result<Option<Book>, AppError>;
    /// Also deletes the book's comments. Returns false if nothing matched.
    async fn delete_book(&self, id: BookId) -> Result<bool, AppError>;

    /// Newest first.
    async fn comments_for_book(&self, book_id: BookId) -> Result<Vec<Comment>, AppError>;
    async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>, AppError>;
    /// `created_date` is assigned here.
    async fn insert_comment(&self, new: &NewComment) -> Result<Comment, AppError>;
    /// Replace the text; `book_id`, `author` and `created_date` never change.
    async fn update_comment_text(&self, id: CommentId, text: &str) -> Result<Option<Comment>, AppError>;
}
