//! Logical view name -> path. Routes in `routes::catalog` mount the same shapes.

use crate::models::{BookId, CommentId};

pub fn book_list() -> String {
    "/books".into()
}

pub fn book_detail(id: BookId) -> String {
    format!("/books/{}", id)
}

pub fn book_create() -> String {
    "/books/new".into()
}

pub fn book_update(id: BookId) -> String {
    format!("/books/{}/edit", id)
}

pub fn book_delete(id: BookId) -> String {
    format!("/books/{}/delete", id)
}

pub fn comment_create(book_id: BookId) -> String {
    format!("/books/{}/comments/new", book_id)
}

pub fn comment_update(id: CommentId) -> String {
    format!("/comments/{}/edit", id)
}

pub fn author_list() -> String {
    "/authors".into()
}

pub fn author_create() -> String {
    "/authors/new".into()
}

pub fn publisher_list() -> String {
    "/publishers".into()
}

pub fn publisher_create() -> String {
    "/publishers/new".into()
}
