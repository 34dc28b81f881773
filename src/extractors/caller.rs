//! Extract the calling user from the request (session cookie or bearer token).
//!
//! `Caller` never rejects; `SignedIn` is the access gate for every mutating route.

use crate::auth::SESSION_COOKIE;
use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

/// Who is making the request. Passed explicitly into every handler and service call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    /// Session user name; `None` for anonymous callers.
    pub user: Option<String>,
    /// Requested path and query, used as the post-login `next` target.
    pub path: String,
    pub login_url: String,
}

impl Caller {
    pub fn anonymous(path: impl Into<String>, login_url: impl Into<String>) -> Self {
        Caller {
            user: None,
            path: path.into(),
            login_url: login_url.into(),
        }
    }

    pub fn authenticated(user: impl Into<String>, path: impl Into<String>, login_url: impl Into<String>) -> Self {
        Caller {
            user: Some(user.into()),
            path: path.into(),
            login_url: login_url.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The session user, or a redirect to login.
    pub fn require_user(&self) -> Result<&str, AppError> {
        match self.user.as_deref() {
            Some(user) => Ok(user),
            None => {
                tracing::warn!(path = %self.path, "unauthenticated request redirected to login");
                Err(AppError::Unauthenticated {
                    login_url: self.login_url.clone(),
                    next: self.path.clone(),
                })
            }
        }
    }
}

/// Session token from the `sessionid` cookie, falling back to `Authorization: Bearer`.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string());
    from_cookie
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(|t| t.trim().to_string())
        })
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = match session_token(&parts.headers) {
            Some(token) => state.sessions.resolve(&token).await,
            None => None,
        };
        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());
        Ok(Caller {
            user,
            path,
            login_url: state.settings.login_url.clone(),
        })
    }
}

/// A caller with a session. Rejects anonymous callers with a login redirect while only
/// request parts have been read, so handlers taking this run no logic and read no body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedIn {
    pub user: String,
}

#[async_trait]
impl FromRequestParts<AppState> for SignedIn {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = match Caller::from_request_parts(parts, state).await {
            Ok(caller) => caller,
            Err(never) => match never {},
        };
        let user = caller.require_user()?;
        Ok(SignedIn { user: user.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; sessionid=abc"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn bearer_is_used_without_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token(&headers).as_deref(), Some("xyz"));
        assert_eq!(session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn anonymous_caller_is_sent_to_login() {
        let caller = Caller::anonymous("/books/new", "/accounts/login/");
        match caller.require_user() {
            Err(AppError::Unauthenticated { next, .. }) => assert_eq!(next, "/books/new"),
            other => panic!("expected redirect, got {:?}", other.map(str::to_string)),
        }
        let caller = Caller::authenticated("alice", "/books/new", "/accounts/login/");
        assert_eq!(caller.require_user().unwrap(), "alice");
    }
}
