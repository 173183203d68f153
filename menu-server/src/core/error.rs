//! Startup and runtime errors for the server process
//!
//! Request-level failures are [`AppError`](shared::error::AppError); these
//! only surface from [`Server::run`](super::Server::run) and state setup.

use thiserror::Error;

use super::config::ConfigError;
use crate::auth::AuthError;
use crate::gateway::GatewayError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gateway setup failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Demo data seeding failed: {0}")]
    Seed(#[from] AuthError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
