//! Core: configuration, shared state, server lifecycle
//!
//! - [`Config`] - environment configuration
//! - [`AppState`] - services shared by every handler
//! - [`Server`] - HTTP server and background tasks
//! - [`ServerError`] - startup errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::AppState;
