//! HTTP API for student records: routing, handlers, the response envelope
//! and the server lifecycle.

pub mod app;
pub mod context;
pub mod middleware;
pub mod server;

pub use app::{SharedStore, build_app};
