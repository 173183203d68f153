//! Orders
//!
//! - [`OrderSubmitter`] - customer checkout
//! - [`OrderBoard`] - staff dashboards and the status state machine

pub mod board;
pub mod submission;

pub use board::{BoardError, OrderBoard};
pub use submission::{CheckoutForm, OrderSubmitter, SubmissionError};
