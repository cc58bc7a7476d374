//! HTTP API layer.
//!
//! Translates HTTP requests into [`Registry`](crate::application::services::Registry)
//! calls and renders the results.
//!
//! # Modules
//!
//! - [`dto`] - Request/response bodies
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing
//! - [`routes`] - Route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
