//! Comment handlers. Both paths are behind the access gate; edits are limited to the comment's author.

use crate::error::AppError;
use crate::extractors::SignedIn;
use crate::handlers::parse_id;
use crate::response::{see_other, success_one};
use crate::service::{CatalogService, RawForm};
use crate::state::AppState;
use crate::urls;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form,
};

pub async fn create_form(
    State(state): State<AppState>,
    _: SignedIn,
    Path(book_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let book_id = parse_id(&book_id)?;
    let form = CatalogService::new_comment_form(state.store.as_ref(), book_id).await?;
    Ok(success_one(form))
}

pub async fn create(
    State(state): State<AppState>,
    SignedIn { user }: SignedIn,
    Path(book_id): Path<String>,
    Form(raw): Form<RawForm>,
) -> Result<Response, AppError> {
    let book_id = parse_id(&book_id)?;
    let comment = CatalogService::create_comment(state.store.as_ref(), &user, book_id, &raw).await?;
    Ok(see_other(urls::book_detail(comment.book_id)))
}

pub async fn update_form(
    State(state): State<AppState>,
    SignedIn { user }: SignedIn,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let form = CatalogService::edit_comment_form(state.store.as_ref(), &user, id).await?;
    Ok(success_one(form))
}

pub async fn update(
    State(state): State<AppState>,
    SignedIn { user }: SignedIn,
    Path(id_str): Path<String>,
    Form(raw): Form<RawForm>,
) -> Result<Response, AppError> {
    let id = parse_id(&id_str)?;
    let comment = CatalogService::update_comment(state.store.as_ref(), &user, id, &raw).await?;
    Ok(see_other(urls::book_detail(comment.book_id)))
}
