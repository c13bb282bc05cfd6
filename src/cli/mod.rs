//! CLI commands module for cws-config.

pub mod app;
pub mod commands;

pub use app::{Cli, Commands};
