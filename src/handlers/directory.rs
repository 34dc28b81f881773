//! Authors and publishers: list and create, so books have something to reference.

use crate::error::AppError;
use crate::extractors::SignedIn;
use crate::response::{see_other, success_many, success_one};
use crate::service::{CatalogService, RawForm};
use crate::state::AppState;
use crate::urls;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form,
};

pub async fn list_authors(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let authors = CatalogService::list_authors(state.store.as_ref()).await?;
    Ok(success_many(authors))
}

pub async fn author_form(_: SignedIn) -> Result<impl IntoResponse, AppError> {
    Ok(success_one(CatalogService::new_author_form()))
}

pub async fn create_author(
    State(state): State<AppState>,
    SignedIn { user }: SignedIn,
    Form(raw): Form<RawForm>,
) -> Result<Response, AppError> {
    CatalogService::create_author(state.store.as_ref(), &user, &raw).await?;
    Ok(see_other(urls::author_list()))
}

pub async fn list_publishers(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let publishers = CatalogService::list_publishers(state.store.as_ref()).await?;
    Ok(success_many(publishers))
}

pub async fn publisher_form(_: SignedIn) -> Result<impl IntoResponse, AppError> {
    Ok(success_one(CatalogService::new_publisher_form()))
}

pub async fn create_publisher(
    State(state): State<AppState>,
    SignedIn { user }: SignedIn,
    Form(raw): Form<RawForm>,
) -> Result<Response, AppError> {
    CatalogService::create_publisher(state.store.as_ref(), &user, &raw).await?;
    Ok(see_other(urls::publisher_list()))
}
