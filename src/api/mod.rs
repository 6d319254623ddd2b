//! API module for the dashboard's HTTP endpoints
//!
//! REST endpoints for tour CRUD, event ingestion and analytics views.

pub mod http;
pub mod rest;
pub mod state;

pub use http::{create_router, serve};
pub use state::AppState;
