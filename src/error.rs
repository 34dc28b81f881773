//! Typed errors and HTTP mapping.

use crate::forms::FormView;
use crate::response::error_body;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("database bootstrap: {0}")]
    Bootstrap(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("not found: {0}")]
    NotFound(String),
    /// The submitted form, bound to its values and field errors, for re-display.
    #[error("validation failed")]
    Validation(Box<FormView>),
    /// Caller has no session; `next` is the path to come back to after login.
    #[error("authentication required")]
    Unauthenticated { login_url: String, next: String },
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn validation(form: FormView) -> Self {
        AppError::Validation(Box::new(form))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, details) = match &self {
            AppError::Unauthenticated { login_url, next } => {
                let location = login_redirect(login_url, next);
                return (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response();
            }
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
            AppError::Validation(form) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                serde_json::to_value(form.as_ref()).ok(),
            ),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden", None),
            AppError::Db(e) => {
                if let sqlx::Error::RowNotFound = e {
                    (StatusCode::NOT_FOUND, "not_found", None)
                } else {
                    tracing::error!(error = %e, "database error");
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
                }
            }
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict", None),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request", None),
        };
        (status, Json(error_body(code, self.to_string(), details))).into_response()
    }
}

/// `login_url?next=<path>`, with `next` percent-encoded.
pub fn login_redirect(login_url: &str, next: &str) -> String {
    let sep = if login_url.contains('?') { '&' } else { '?' };
    format!("{}{}next={}", login_url, sep, urlencoding::encode(next))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_redirect_encodes_the_next_path() {
        assert_eq!(
            login_redirect("/accounts/login/", "/books/3/edit"),
            "/accounts/login/?next=%2Fbooks%2F3%2Fedit"
        );
    }

    #[test]
    fn login_redirect_escapes_query_characters() {
        assert_eq!(
            login_redirect("/login?theme=dark", "/books?a=1&b=2"),
            "/login?theme=dark&next=%2Fbooks%3Fa%3D1%26b%3D2"
        );
    }

    #[test]
    fn unauthenticated_is_a_redirect_not_a_body() {
        let resp = AppError::Unauthenticated {
            login_url: "/accounts/login/".into(),
            next: "/books/new".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/accounts/login/?next=%2Fbooks%2Fnew")
        );
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = AppError::NotFound("book 9".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
