//! User Model

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Staff user as seen by clients (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Stored case-folded; unique
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub restaurant_id: Option<String>,
    pub is_active: bool,
}

/// Sign-up payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub restaurant_id: Option<String>,
}
