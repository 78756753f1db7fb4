use std::sync::Arc;

use crate::config::Config;
use crate::rewrite::RewriteClient;
use crate::storage::KeyValueStore;
use crate::sync::SyncHandle;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Front door to the sync controller. Handlers never touch the surface directly.
    pub sync: SyncHandle,
    pub store: Arc<dyn KeyValueStore>,
    pub rewrite: RewriteClient,
    pub config: Config,
}
