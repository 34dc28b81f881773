//! In-process store. All tables sit behind one lock so cascades are atomic.

use super::CatalogStore;
use crate::error::AppError;
use crate::models::*;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    next_id: i64,
    publishers: BTreeMap<PublisherId, Publisher>,
    authors: BTreeMap<AuthorId, Author>,
    books: BTreeMap<BookId, Book>,
    comments: BTreeMap<CommentId, Comment>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_book_refs(&self, new: &NewBook) -> Result<(), AppError> {
        if !self.authors.contains_key(&new.author_id) {
            return Err(AppError::Conflict(format!("author {} does not exist", new.author_id)));
        }
        if !self.publishers.contains_key(&new.publisher_id) {
            return Err(AppError::Conflict(format!("publisher {} does not exist", new.publisher_id)));
        }
        Ok(())
    }

    fn remove_books_where(&mut self, pred: impl Fn(&Book) -> bool) {
        let doomed: Vec<BookId> = self.books.values().filter(|b| pred(b)).map(|b| b.id).collect();
        for id in doomed {
            self.remove_book(id);
        }
    }

    fn remove_book(&mut self, id: BookId) -> bool {
        if self.books.remove(&id).is_none() {
            return false;
        }
        self.comments.retain(|_, c| c.book_id != id);
        true
    }
}

/// Ids are shared across tables and start at 1.
#[derive(Default)]
pub struct MemoryCatalogStore {
    tables: RwLock<Tables>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list_publishers(&self) -> Result<Vec<Publisher>, AppError> {
        Ok(self.tables.read().await.publishers.values().cloned().collect())
    }

    async fn get_publisher(&self, id: PublisherId) -> Result<Option<Publisher>, AppError> {
        Ok(self.tables.read().await.publishers.get(&id).cloned())
    }

    async fn insert_publisher(&self, new: &NewPublisher) -> Result<Publisher, AppError> {
        let mut t = self.tables.write().await;
        let publisher = Publisher {
            id: t.next_id(),
            name: new.name.clone(),
            address: new.address.clone(),
        };
        t.publishers.insert(publisher.id, publisher.clone());
        Ok(publisher)
    }

    async fn delete_publisher(&self, id: PublisherId) -> Result<bool, AppError> {
        let mut t = self.tables.write().await;
        if t.publishers.remove(&id).is_none() {
            return Ok(false);
        }
        t.remove_books_where(|b| b.publisher_id == id);
        Ok(true)
    }

    async fn list_authors(&self) -> Result<Vec<Author>, AppError> {
        Ok(self.tables.read().await.authors.values().cloned().collect())
    }

    async fn get_author(&self, id: AuthorId) -> Result<Option<Author>, AppError> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn insert_author(&self, new: &NewAuthor) -> Result<Author, AppError> {
        let mut t = self.tables.write().await;
        let author = Author {
            id: t.next_id(),
            name: new.name.clone(),
            email: new.email.clone(),
        };
        t.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn delete_author(&self, id: AuthorId) -> Result<bool, AppError> {
        let mut t = self.tables.write().await;
        if t.authors.remove(&id).is_none() {
            return Ok(false);
        }
        t.remove_books_where(|b| b.author_id == id);
        Ok(true)
    }

    async fn list_books(&self) -> Result<Vec<Book>, AppError> {
        let mut books: Vec<Book> = self.tables.read().await.books.values().cloned().collect();
        books.sort_by(|a, b| {
            b.publication_date
                .cmp(&a.publication_date)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(books)
    }

    async fn get_book(&self, id: BookId) -> Result<Option<Book>, AppError> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn insert_book(&self, new: &NewBook) -> Result<Book, AppError> {
        let mut t = self.tables.write().await;
        t.check_book_refs(new)?;
        let book = Book {
            id: t.next_id(),
            title: new.title.clone(),
            author_id: new.author_id,
            publisher_id: new.publisher_id,
            publication_date: new.publication_date,
            post_photo: new.post_photo.clone(),
        };
        t.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update_book(&self, id: BookId, new: &NewBook) -> Result<Option<Book>, AppError> {
        let mut t = self.tables.write().await;
        if !t.books.contains_key(&id) {
            return Ok(None);
        }
        t.check_book_refs(new)?;
        let book = Book {
            id,
            title: new.title.clone(),
            author_id: new.author_id,
            publisher_id: new.publisher_id,
            publication_date: new.publication_date,
            post_photo: new.post_photo.clone(),
        };
        t.books.insert(id, book.clone());
        Ok(Some(book))
    }

    async fn delete_book(&self, id: BookId) -> Result<bool, AppError> {
        Ok(self.tables.write().await.remove_book(id))
    }

    async fn comments_for_book(&self, book_id: BookId) -> Result<Vec<Comment>, AppError> {
        let mut comments: Vec<Comment> = self
            .tables
            .read()
            .await
            .comments
            .values()
            .filter(|c| c.book_id == book_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_date.cmp(&a.created_date).then_with(|| b.id.cmp(&a.id)));
        Ok(comments)
    }

    async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>, AppError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn insert_comment(&self, new: &NewComment) -> Result<Comment, AppError> {
        let mut t = self.tables.write().await;
        if !t.books.contains_key(&new.book_id) {
            return Err(AppError::Conflict(format!("book {} does not exist", new.book_id)));
        }
        let comment = Comment {
            id: t.next_id(),
            book_id: new.book_id,
            author: new.author.clone(),
            text: new.text.clone(),
            created_date: Utc::now(),
        };
        t.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update_comment_text(&self, id: CommentId, text: &str) -> Result<Option<Comment>, AppError> {
        let mut t = self.tables.write().await;
        Ok(t.comments.get_mut(&id).map(|c| {
            c.text = text.to_string();
            c.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    async fn seeded() -> (MemoryCatalogStore, Author, Publisher) {
        let store = MemoryCatalogStore::new();
        let author = store
            .insert_author(&NewAuthor {
                name: "Frank Herbert".into(),
                email: "frank@example.com".into(),
            })
            .await
            .unwrap();
        let publisher = store
            .insert_publisher(&NewPublisher {
                name: "Chilton".into(),
                address: "Philadelphia".into(),
            })
            .await
            .unwrap();
        (store, author, publisher)
    }

    fn book(title: &str, a: &Author, p: &Publisher, y: i32) -> NewBook {
        NewBook {
            title: title.into(),
            author_id: a.id,
            publisher_id: p.id,
            publication_date: NaiveDate::from_ymd_opt(y, 1, 1).unwrap(),
            post_photo: None,
        }
    }

    #[tokio::test]
    async fn books_list_newest_publication_first() {
        let (store, a, p) = seeded().await;
        store.insert_book(&book("Old", &a, &p, 1950)).await.unwrap();
        store.insert_book(&book("New", &a, &p, 2000)).await.unwrap();
        store.insert_book(&book("Mid", &a, &p, 1975)).await.unwrap();
        let titles: Vec<String> = store.list_books().await.unwrap().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["New", "Mid", "Old"]);
    }

    #[tokio::test]
    async fn dangling_references_are_refused() {
        let (store, a, p) = seeded().await;
        let mut bad = book("X", &a, &p, 2000);
        bad.author_id = 999;
        assert!(matches!(store.insert_book(&bad).await, Err(AppError::Conflict(_))));
        assert!(store.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_a_book_removes_its_comments_only() {
        let (store, a, p) = seeded().await;
        let keep = store.insert_book(&book("Keep", &a, &p, 2000)).await.unwrap();
        let gone = store.insert_book(&book("Gone", &a, &p, 2001)).await.unwrap();
        for b in [&keep, &gone] {
            store
                .insert_comment(&NewComment {
                    book_id: b.id,
                    author: "alice".into(),
                    text: "hi".into(),
                })
                .await
                .unwrap();
        }
        assert!(store.delete_book(gone.id).await.unwrap());
        assert!(!store.delete_book(gone.id).await.unwrap());
        assert!(store.comments_for_book(gone.id).await.unwrap().is_empty());
        assert_eq!(store.comments_for_book(keep.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_an_author_cascades_to_books_and_comments() {
        let (store, a, p) = seeded().await;
        let b = store.insert_book(&book("Dune", &a, &p, 1965)).await.unwrap();
        let c = store
            .insert_comment(&NewComment {
                book_id: b.id,
                author: "alice".into(),
                text: "hi".into(),
            })
            .await
            .unwrap();
        assert!(store.delete_author(a.id).await.unwrap());
        assert!(store.get_book(b.id).await.unwrap().is_none());
        assert!(store.get_comment(c.id).await.unwrap().is_none());
        assert!(store.get_publisher(p.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn deleting_a_publisher_cascades_to_books() {
        let (store, a, p) = seeded().await;
        store.insert_book(&book("Dune", &a, &p, 1965)).await.unwrap();
        assert!(store.delete_publisher(p.id).await.unwrap());
        assert!(store.list_books().await.unwrap().is_empty());
        assert_eq!(store.list_authors().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn comment_update_keeps_author_and_created_date() {
        let (store, a, p) = seeded().await;
        let b = store.insert_book(&book("Dune", &a, &p, 1965)).await.unwrap();
        let c = store
            .insert_comment(&NewComment {
                book_id: b.id,
                author: "alice".into(),
                text: "first".into(),
            })
            .await
            .unwrap();
        let updated = store.update_comment_text(c.id, "second").await.unwrap().unwrap();
        assert_eq!(updated.text, "second");
        assert_eq!(updated.author, c.author);
        assert_eq!(updated.created_date, c.created_date);
        assert!(store.update_comment_text(9999, "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn comments_list_newest_first() {
        let (store, a, p) = seeded().await;
        let b = store.insert_book(&book("Dune", &a, &p, 1965)).await.unwrap();
        for text in ["one", "two", "three"] {
            store
                .insert_comment(&NewComment {
                    book_id: b.id,
                    author: "alice".into(),
                    text: text.into(),
                })
                .await
                .unwrap();
        }
        let texts: Vec<String> = store
            .comments_for_book(b.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["three", "two", "one"]);
    }
}
