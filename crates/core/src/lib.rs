//! Core business logic for backdesk.

pub mod services;

pub use services::*;
