//! Catalog records as stored and as returned to the rendering layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

pub type PublisherId = i64;
pub type AuthorId = i64;
pub type BookId = i64;
pub type CommentId = i64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Publisher {
    pub id: PublisherId,
    pub name: String,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author_id: AuthorId,
    pub publisher_id: PublisherId,
    pub publication_date: NaiveDate,
    /// Storage path of the cover image (`photo/YYYY/MM/DD/<file>`); bytes live in the blob store.
    pub post_photo: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: CommentId,
    pub book_id: BookId,
    /// Display name of whoever wrote the comment. Not a foreign key.
    pub author: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
}

/// Editable fields of a book, after validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author_id: AuthorId,
    pub publisher_id: PublisherId,
    pub publication_date: NaiveDate,
    pub post_photo: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewComment {
    pub book_id: BookId,
    pub author: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAuthor {
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPublisher {
    pub name: String,
    pub address: String,
}

/// Everything the book detail page shows.
#[derive(Clone, Debug, Serialize)]
pub struct BookDetail {
    pub book: Book,
    pub author: Author,
    pub publisher: Publisher,
    pub comments: Vec<Comment>,
    /// Present only for authenticated callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_form: Option<crate::forms::FormView>,
}
