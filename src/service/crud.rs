//! Catalog operations: form validation, then one store write. Mutations take the signed-in
//! user name; the access gate itself is the `SignedIn` extractor.

use crate::config::{AUTHOR_FIELDS, BOOK_FIELDS, COMMENT_AUTHOR_MAX_LENGTH, COMMENT_FIELDS, PUBLISHER_FIELDS};
use crate::error::AppError;
use crate::extractors::Caller;
use crate::forms::{FieldErrors, FormView};
use crate::models::*;
use crate::photo;
use crate::service::validation::{FormValidator, INVALID_CHOICE};
use crate::store::CatalogStore;
use crate::urls;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;

/// Raw submitted form fields.
pub type RawForm = HashMap<String, String>;

/// Options for the author and publisher selects of the book form.
#[derive(Clone, Debug, Serialize)]
pub struct BookChoices {
    pub authors: Vec<Author>,
    pub publishers: Vec<Publisher>,
}

/// The "are you sure" page shown before a book is deleted.
#[derive(Clone, Debug, Serialize)]
pub struct DeleteConfirmation {
    pub book: Book,
    pub action: String,
    pub cancel: String,
}

pub struct CatalogService;

impl CatalogService {
    pub async fn list_books(store: &dyn CatalogStore) -> Result<Vec<Book>, AppError> {
        let books = store.list_books().await?;
        tracing::debug!(count = books.len(), "listed books");
        Ok(books)
    }

    /// Book with its author, publisher and comments; the comment form only for signed-in callers.
    pub async fn book_detail(store: &dyn CatalogStore, caller: &Caller, id: BookId) -> Result<BookDetail, AppError> {
        let book = Self::require_book(store, id).await?;
        let author = store
            .get_author(book.author_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("author {}", book.author_id)))?;
        let publisher = store
            .get_publisher(book.publisher_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("publisher {}", book.publisher_id)))?;
        let comments = store.comments_for_book(id).await?;
        let comment_form = caller
            .is_authenticated()
            .then(|| FormView::blank(urls::comment_create(id), COMMENT_FIELDS));
        Ok(BookDetail {
            book,
            author,
            publisher,
            comments,
            comment_form,
        })
    }

    pub async fn new_book_form(store: &dyn CatalogStore) -> Result<FormView, AppError> {
        let choices = Self::book_choices(store).await?;
        Ok(FormView::blank(urls::book_create(), BOOK_FIELDS).with_context(&choices))
    }

    pub async fn create_book(store: &dyn CatalogStore, user: &str, raw: &RawForm) -> Result<Book, AppError> {
        let new = Self::clean_book(store, raw, urls::book_create()).await?;
        let book = store.insert_book(&new).await?;
        tracing::info!(book_id = book.id, user = %user, "book created");
        Ok(book)
    }

    pub async fn edit_book_form(store: &dyn CatalogStore, id: BookId) -> Result<FormView, AppError> {
        let book = Self::require_book(store, id).await?;
        let choices = Self::book_choices(store).await?;
        Ok(FormView::initial(urls::book_update(id), BOOK_FIELDS, &book_initial(&book)).with_context(&choices))
    }

    /// Full replace of the editable fields; the id is unchanged.
    pub async fn update_book(
        store: &dyn CatalogStore,
        user: &str,
        id: BookId,
        raw: &RawForm,
    ) -> Result<Book, AppError> {
        Self::require_book(store, id).await?;
        let new = Self::clean_book(store, raw, urls::book_update(id)).await?;
        let book = store
            .update_book(id, &new)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("book {}", id)))?;
        tracing::info!(book_id = id, user = %user, "book updated");
        Ok(book)
    }

    pub async fn confirm_delete_book(store: &dyn CatalogStore, id: BookId) -> Result<DeleteConfirmation, AppError> {
        let book = Self::require_book(store, id).await?;
        Ok(DeleteConfirmation {
            book,
            action: urls::book_delete(id),
            cancel: urls::book_detail(id),
        })
    }

    /// Deletes the book and, by cascade, its comments.
    pub async fn delete_book(store: &dyn CatalogStore, user: &str, id: BookId) -> Result<(), AppError> {
        if !store.delete_book(id).await? {
            return Err(AppError::NotFound(format!("book {}", id)));
        }
        tracing::info!(book_id = id, user = %user, "book deleted");
        Ok(())
    }

    pub async fn new_comment_form(store: &dyn CatalogStore, book_id: BookId) -> Result<FormView, AppError> {
        let book = Self::require_book(store, book_id).await?;
        Ok(FormView::blank(urls::comment_create(book_id), COMMENT_FIELDS).with_context(&book))
    }

    /// The comment author is the session user; a submitted `author` field is ignored.
    pub async fn create_comment(
        store: &dyn CatalogStore,
        user: &str,
        book_id: BookId,
        raw: &RawForm,
    ) -> Result<Comment, AppError> {
        if user.chars().count() > COMMENT_AUTHOR_MAX_LENGTH {
            tracing::warn!(book_id, "comment refused: user name too long to record as author");
            return Err(AppError::BadRequest(format!(
                "user name exceeds {} characters and cannot author comments",
                COMMENT_AUTHOR_MAX_LENGTH
            )));
        }
        let book = Self::require_book(store, book_id).await?;
        let text = FormValidator::comment(raw).map_err(|errors| {
            AppError::validation(
                FormView::bound(urls::comment_create(book_id), COMMENT_FIELDS, raw, &errors).with_context(&book),
            )
        })?;
        let comment = store
            .insert_comment(&NewComment {
                book_id,
                author: user.to_string(),
                text,
            })
            .await?;
        tracing::info!(comment_id = comment.id, book_id, user = %user, "comment created");
        Ok(comment)
    }

    pub async fn edit_comment_form(store: &dyn CatalogStore, user: &str, id: CommentId) -> Result<FormView, AppError> {
        let comment = Self::require_own_comment(store, user, id).await?;
        let book = Self::require_book(store, comment.book_id).await?;
        let mut values = HashMap::new();
        values.insert("text".to_string(), comment.text);
        Ok(FormView::initial(urls::comment_update(id), COMMENT_FIELDS, &values).with_context(&book))
    }

    /// Only the comment's author may edit it, and only the text changes.
    pub async fn update_comment(
        store: &dyn CatalogStore,
        user: &str,
        id: CommentId,
        raw: &RawForm,
    ) -> Result<Comment, AppError> {
        let comment = Self::require_own_comment(store, user, id).await?;
        let text = match FormValidator::comment(raw) {
            Ok(text) => text,
            Err(errors) => {
                let book = Self::require_book(store, comment.book_id).await?;
                return Err(AppError::validation(
                    FormView::bound(urls::comment_update(id), COMMENT_FIELDS, raw, &errors).with_context(&book),
                ));
            }
        };
        let updated = store
            .update_comment_text(id, &text)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {}", id)))?;
        tracing::info!(comment_id = id, book_id = updated.book_id, "comment updated");
        Ok(updated)
    }

    pub async fn list_authors(store: &dyn CatalogStore) -> Result<Vec<Author>, AppError> {
        store.list_authors().await
    }

    pub fn new_author_form() -> FormView {
        FormView::blank(urls::author_create(), AUTHOR_FIELDS)
    }

    pub async fn create_author(store: &dyn CatalogStore, user: &str, raw: &RawForm) -> Result<Author, AppError> {
        let new = FormValidator::author(raw).map_err(|errors| {
            AppError::validation(FormView::bound(urls::author_create(), AUTHOR_FIELDS, raw, &errors))
        })?;
        let author = store.insert_author(&new).await?;
        tracing::info!(author_id = author.id, user = %user, "author created");
        Ok(author)
    }

    pub async fn list_publishers(store: &dyn CatalogStore) -> Result<Vec<Publisher>, AppError> {
        store.list_publishers().await
    }

    pub fn new_publisher_form() -> FormView {
        FormView::blank(urls::publisher_create(), PUBLISHER_FIELDS)
    }

    pub async fn create_publisher(
        store: &dyn CatalogStore,
        user: &str,
        raw: &RawForm,
    ) -> Result<Publisher, AppError> {
        let new = FormValidator::publisher(raw).map_err(|errors| {
            AppError::validation(FormView::bound(urls::publisher_create(), PUBLISHER_FIELDS, raw, &errors))
        })?;
        let publisher = store.insert_publisher(&new).await?;
        tracing::info!(publisher_id = publisher.id, user = %user, "publisher created");
        Ok(publisher)
    }

    async fn require_book(store: &dyn CatalogStore, id: BookId) -> Result<Book, AppError> {
        store
            .get_book(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("book {}", id)))
    }

    async fn require_own_comment(store: &dyn CatalogStore, user: &str, id: CommentId) -> Result<Comment, AppError> {
        let comment = store
            .get_comment(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {}", id)))?;
        if comment.author != user {
            tracing::warn!(comment_id = id, user = %user, "comment edit refused: not the author");
            return Err(AppError::Forbidden(format!("comment {} belongs to another user", id)));
        }
        Ok(comment)
    }

    async fn book_choices(store: &dyn CatalogStore) -> Result<BookChoices, AppError> {
        Ok(BookChoices {
            authors: store.list_authors().await?,
            publishers: store.list_publishers().await?,
        })
    }

    /// Field validation, the stored photo path length and author/publisher existence;
    /// all problems are reported together.
    async fn clean_book(store: &dyn CatalogStore, raw: &RawForm, action: String) -> Result<NewBook, AppError> {
        let validated = FormValidator::book(raw);
        let mut errors = validated.as_ref().err().cloned().unwrap_or_default();

        let today = Utc::now().date_naive();
        let post_photo = validated
            .as_ref()
            .ok()
            .and_then(|fields| fields.post_photo.as_deref())
            .and_then(|p| photo::resolve_submitted(p, today));
        if let Some(message) = post_photo.as_deref().and_then(photo::path_too_long) {
            errors.add("post_photo", message);
        }

        if let Some(id) = reference_id(raw, "author", &errors) {
            if store.get_author(id).await?.is_none() {
                errors.add("author", INVALID_CHOICE);
            }
        }
        if let Some(id) = reference_id(raw, "publisher", &errors) {
            if store.get_publisher(id).await?.is_none() {
                errors.add("publisher", INVALID_CHOICE);
            }
        }

        match validated {
            Ok(fields) if errors.is_empty() => Ok(NewBook {
                title: fields.title,
                author_id: fields.author_id,
                publisher_id: fields.publisher_id,
                publication_date: fields.publication_date,
                post_photo,
            }),
            _ => {
                let choices = Self::book_choices(store).await?;
                Err(AppError::validation(
                    FormView::bound(action, BOOK_FIELDS, raw, &errors).with_context(&choices),
                ))
            }
        }
    }
}

/// A reference id worth looking up: well-formed and not already in error.
fn reference_id(raw: &RawForm, field: &str, errors: &FieldErrors) -> Option<i64> {
    if errors.contains(field) {
        return None;
    }
    raw.get(field).and_then(|v| v.trim().parse::<i64>().ok())
}

/// Current values of a book as form strings.
pub fn book_initial(book: &Book) -> HashMap<String, String> {
    let mut values = HashMap::new();
    values.insert("title".to_string(), book.title.clone());
    values.insert("author".to_string(), book.author_id.to_string());
    values.insert("publisher".to_string(), book.publisher_id.to_string());
    values.insert(
        "publication_date".to_string(),
        book.publication_date.format("%Y-%m-%d").to_string(),
    );
    values.insert("post_photo".to_string(), book.post_photo.clone().unwrap_or_default());
    values
}
