//! Gateway error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use super::Table;

/// Errors raised by any [`DataGateway`](super::DataGateway) implementation
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Request never produced a response (DNS, connect, TLS, reset)
    #[error("Gateway unreachable: {0}")]
    Transport(String),

    #[error("Gateway request timed out")]
    Timeout,

    /// The store answered with an error (constraint violation, bad filter, RLS)
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// A row did not match the expected shape
    #[error("Malformed {table} row: {message}")]
    Malformed { table: Table, message: String },

    /// `single` cardinality expected exactly one row
    #[error("Expected one {table} row, got {count}")]
    Cardinality { table: Table, count: usize },
}

impl GatewayError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, GatewayError::Rejected { status: 409, .. })
    }

    /// Message suitable for passing through to a user
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match &err {
            GatewayError::Transport(_) => AppError::with_message(ErrorCode::NetworkError, err.to_string()),
            GatewayError::Timeout => AppError::new(ErrorCode::TimeoutError),
            GatewayError::Rejected { status: 409, message } => {
                AppError::with_message(ErrorCode::AlreadyExists, message.clone())
            }
            GatewayError::Rejected { status, message } => {
                AppError::database(message.clone()).with_detail("status", *status)
            }
            GatewayError::Malformed { table, .. } => {
                AppError::database(err.to_string()).with_detail("table", table.as_str())
            }
            GatewayError::Cardinality { table, count } => {
                if *count == 0 {
                    AppError::not_found(table.as_str())
                } else {
                    AppError::database(err.to_string())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let err: AppError = GatewayError::Timeout.into();
        assert_eq!(err.code, ErrorCode::TimeoutError);

        let err: AppError = GatewayError::Rejected {
            status: 409,
            message: "duplicate key".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);

        let err: AppError = GatewayError::Cardinality {
            table: Table::Orders,
            count: 0,
        }
        .into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_user_message_passes_store_text_through() {
        let err = GatewayError::Rejected {
            status: 409,
            message: "email already registered".into(),
        };
        assert_eq!(err.user_message(), "email already registered");
        assert!(err.is_conflict());
    }
}
