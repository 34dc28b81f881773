//! Book handlers: list, detail, create, update, delete (with confirmation).

use crate::error::AppError;
use crate::extractors::{Caller, SignedIn};
use crate::handlers::parse_id;
use crate::response::{see_other, success_many, success_one};
use crate::service::{CatalogService, RawForm};
use crate::state::AppState;
use crate::urls;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form,
};

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let books = CatalogService::list_books(state.store.as_ref()).await?;
    Ok(success_many(books))
}

pub async fn detail(
    State(state): State<AppState>,
    caller: Caller,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let detail = CatalogService::book_detail(state.store.as_ref(), &caller, id).await?;
    Ok(success_one(detail))
}

pub async fn create_form(State(state): State<AppState>, _: SignedIn) -> Result<impl IntoResponse, AppError> {
    let form = CatalogService::new_book_form(state.store.as_ref()).await?;
    Ok(success_one(form))
}

pub async fn create(
    State(state): State<AppState>,
    SignedIn { user }: SignedIn,
    Form(raw): Form<RawForm>,
) -> Result<Response, AppError> {
    let book = CatalogService::create_book(state.store.as_ref(), &user, &raw).await?;
    Ok(see_other(urls::book_detail(book.id)))
}

pub async fn update_form(
    State(state): State<AppState>,
    _: SignedIn,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let form = CatalogService::edit_book_form(state.store.as_ref(), id).await?;
    Ok(success_one(form))
}

pub async fn update(
    State(state): State<AppState>,
    SignedIn { user }: SignedIn,
    Path(id_str): Path<String>,
    Form(raw): Form<RawForm>,
) -> Result<Response, AppError> {
    let id = parse_id(&id_str)?;
    let book = CatalogService::update_book(state.store.as_ref(), &user, id, &raw).await?;
    Ok(see_other(urls::book_detail(book.id)))
}

pub async fn delete_confirm(
    State(state): State<AppState>,
    _: SignedIn,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let page = CatalogService::confirm_delete_book(state.store.as_ref(), id).await?;
    Ok(success_one(page))
}

pub async fn delete(
    State(state): State<AppState>,
    SignedIn { user }: SignedIn,
    Path(id_str): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id_str)?;
    CatalogService::delete_book(state.store.as_ref(), &user, id).await?;
    Ok(see_other(urls::book_list()))
}
