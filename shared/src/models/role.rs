//! Role Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Staff role (closed set, stored as snake_case text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    RestaurantAdmin,
    Cashier,
    Chef,
    Waiter,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::SuperAdmin,
        Role::RestaurantAdmin,
        Role::Cashier,
        Role::Chef,
        Role::Waiter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::RestaurantAdmin => "restaurant_admin",
            Role::Cashier => "cashier",
            Role::Chef => "chef",
            Role::Waiter => "waiter",
        }
    }

    /// Roles that must belong to a restaurant
    pub fn requires_restaurant(&self) -> bool {
        !matches!(self, Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_names() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
        assert!(serde_json::from_str::<Role>("\"manager\"").is_err());
    }
}
