pub mod health;
pub mod validation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /validation/validate    POST  dry-run form validation
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/validation", validation::router())
}
