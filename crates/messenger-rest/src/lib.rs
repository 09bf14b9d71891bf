//! # Messenger REST
//!
//! REST API layer using Axum. Exposes the user and address endpoints under
//! `/api/users`, plus health and OpenAPI endpoints.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
