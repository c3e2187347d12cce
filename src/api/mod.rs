//! Dashboard HTTP server
//!
//! Serves the interactive page and a JSON view of the same report.
//! Run with `painel-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server, ApiConfig, AppState};
