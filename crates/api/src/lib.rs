//! HTTP API layer for backdesk.
//!
//! This crate provides the back-office REST API:
//!
//! - **Endpoints**: report review and support ticket workflows
//! - **Responses**: a uniform `{ success, data | error }` envelope
//!
//! Built on Axum 0.8; handlers are POST-RPC style with JSON bodies.

pub mod endpoints;
pub mod response;
pub mod state;

pub use endpoints::router;
pub use response::ApiResponse;
pub use state::AppState;
