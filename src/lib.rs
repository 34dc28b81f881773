//! Library catalog: books, authors, publishers and comments behind a session gate.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod photo;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod urls;

pub use auth::{SessionProvider, StaticSessions};
pub use config::Settings;
pub use error::{AppError, ConfigError};
pub use extractors::{Caller, SignedIn};
pub use response::{error_body, success_many, success_one};
pub use routes::{app, catalog_routes, common_routes};
pub use service::CatalogService;
pub use state::AppState;
pub use store::{ensure_catalog_tables, ensure_database_exists, CatalogStore, MemoryCatalogStore, PgCatalogStore};
