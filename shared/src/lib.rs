//! Shared types for the QR menu platform
//!
//! Domain models, the customer cart, and the unified error system used by
//! `menu-server` and any client that talks to its HTTP API.

pub mod cart;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use cart::{Cart, CartError, CartLine, MAX_LINE_QUANTITY};
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
