//! Runtime settings read from the environment (after `.env`, if present).

use crate::config::COMMENT_AUTHOR_MAX_LENGTH;
use crate::error::ConfigError;
use std::collections::HashMap;
use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_LOGIN_URL: &str = "/accounts/login/";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_MAX_FORM_BYTES: usize = 64 * 1024;

#[derive(Clone, Debug)]
pub struct Settings {
    /// When unset the catalog runs on the in-memory store.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub login_url: String,
    /// Session token -> user name, for the static session provider.
    pub sessions: HashMap<String, String>,
    pub max_form_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            login_url: DEFAULT_LOGIN_URL.into(),
            sessions: HashMap::new(),
            max_form_bytes: DEFAULT_MAX_FORM_BYTES,
        }
    }
}

impl Settings {
    /// Reads `.env` first when present; real environment variables win.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.parse::<u32>().ok().filter(|n| *n > 0).ok_or(ConfigError::Invalid {
                name: "DATABASE_MAX_CONNECTIONS",
                reason: format!("expected a positive integer, got '{}'", v),
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;
        let max_form_bytes = match get("MAX_FORM_BYTES") {
            Some(v) => v.parse::<usize>().map_err(|_| ConfigError::Invalid {
                name: "MAX_FORM_BYTES",
                reason: format!("expected a byte count, got '{}'", v),
            })?,
            None => DEFAULT_MAX_FORM_BYTES,
        };
        let sessions = match get("CATALOG_SESSIONS") {
            Some(v) => parse_sessions(&v)?,
            None => HashMap::new(),
        };

        Ok(Settings {
            database_url: get("DATABASE_URL"),
            max_connections,
            bind_addr,
            login_url: get("LOGIN_URL").unwrap_or_else(|| DEFAULT_LOGIN_URL.into()),
            sessions,
            max_form_bytes,
        })
    }
}

/// Parse `token=user,token=user`.
fn parse_sessions(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut out = HashMap::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (token, user) = pair
            .split_once('=')
            .map(|(t, u)| (t.trim(), u.trim()))
            .filter(|(t, u)| !t.is_empty() && !u.is_empty())
            .ok_or_else(|| ConfigError::Invalid {
                name: "CATALOG_SESSIONS",
                reason: format!("expected token=user, got '{}'", pair),
            })?;
        if user.chars().count() > COMMENT_AUTHOR_MAX_LENGTH {
            return Err(ConfigError::Invalid {
                name: "CATALOG_SESSIONS",
                reason: format!("user name for '{}' exceeds {} characters", token, COMMENT_AUTHOR_MAX_LENGTH),
            });
        }
        out.insert(token.to_string(), user.to_string());
    }
    Ok(out)
}
