//! REST API module for external integrations
//!
//! Provides an HTTP API for browsing the region catalog, submitting jobs and
//! reviewing the job history.

mod dto;
mod handlers;
mod server;
mod sustainability;

pub use dto::{ErrorResponse, HealthResponse};
pub use server::{build_router, run_server};
