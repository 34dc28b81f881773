//! Shared application state for all routes.

use crate::auth::SessionProvider;
use crate::config::Settings;
use crate::store::CatalogStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub sessions: Arc<dyn SessionProvider>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>, sessions: Arc<dyn SessionProvider>, settings: Settings) -> Self {
        AppState {
            store,
            sessions,
            settings: Arc::new(settings),
        }
    }
}
