//! HTTP server for the guest gateway
//!
//! Axum application setup and request handlers.

pub mod app;
pub mod handlers;

pub use app::{AppState, create_app};
