//! HTTP and WebSocket surface.
//!
//! [`AppContext`] is built once at startup; [`router`] exposes the REST
//! endpoints and the real-time channel over it.

pub mod context;
pub mod rest;
pub mod routes;
pub mod ws;

pub use context::AppContext;
pub use rest::{ApiError, VERSION};
pub use routes::router;
