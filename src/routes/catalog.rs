//! Catalog page and form routes. Paths match `crate::urls`.

use crate::handlers::{books, comments, directory};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn catalog_routes(state: AppState) -> Router {
    Router::new()
        .route("/books", get(books::list))
        .route("/books/new", get(books::create_form).post(books::create))
        .route("/books/:id", get(books::detail))
        .route("/books/:id/edit", get(books::update_form).post(books::update))
        .route("/books/:id/delete", get(books::delete_confirm).post(books::delete))
        .route(
            "/books/:id/comments/new",
            get(comments::create_form).post(comments::create),
        )
        .route("/comments/:id/edit", get(comments::update_form).post(comments::update))
        .route("/authors", get(directory::list_authors))
        .route("/authors/new", get(directory::author_form).post(directory::create_author))
        .route("/publishers", get(directory::list_publishers))
        .route(
            "/publishers/new",
            get(directory::publisher_form).post(directory::create_publisher),
        )
        .with_state(state)
}
