//! CLI command handlers

pub mod commands;

pub use commands::{cities, export, html, report, trend, watch};
