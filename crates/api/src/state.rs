use std::sync::Arc;

use reborn_core::validation::Registry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: reborn_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Validation rule registry, built once at startup, read-only afterwards.
    pub registry: Arc<Registry>,
}
