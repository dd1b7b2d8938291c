//! API endpoints.

mod reports;
mod tickets;

use axum::Router;

use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/reports", reports::router())
        .nest("/tickets", tickets::router())
}
