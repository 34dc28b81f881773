//! Session lookup. The identity provider that issues sessions lives outside this crate;
//! it is reached through `SessionProvider`.

use async_trait::async_trait;
use std::collections::HashMap;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "sessionid";

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// User name for a live session token, or `None` if the token is unknown or expired.
    async fn resolve(&self, token: &str) -> Option<String>;
}

/// Fixed token table, loaded from settings.
#[derive(Clone, Debug, Default)]
pub struct StaticSessions {
    users_by_token: HashMap<String, String>,
}

impl StaticSessions {
    pub fn new(users_by_token: HashMap<String, String>) -> Self {
        StaticSessions { users_by_token }
    }

    pub fn with(mut self, token: impl Into<String>, user: impl Into<String>) -> Self {
        self.users_by_token.insert(token.into(), user.into());
        self
    }
}

#[async_trait]
impl SessionProvider for StaticSessions {
    async fn resolve(&self, token: &str) -> Option<String> {
        self.users_by_token.get(token).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_tokens_resolve_to_nobody() {
        let sessions = StaticSessions::default().with("t1", "alice");
        assert_eq!(sessions.resolve("t1").await.as_deref(), Some("alice"));
        assert_eq!(sessions.resolve("t2").await, None);
    }
}
