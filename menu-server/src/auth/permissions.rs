//! Permission Definitions
//!
//! Fixed role → permission-set table. A role grants a permission when its
//! set contains either the wildcard `all` or the exact name.

use shared::models::Role;

pub const ALL: &str = "all";

pub const ORDERS_VIEW: &str = "orders_view";
pub const ORDERS_UPDATE: &str = "orders_update";
pub const ORDERS_CREATE: &str = "orders_create";
pub const MENU_MANAGE: &str = "menu_manage";
pub const TABLES_MANAGE: &str = "tables_manage";
pub const TABLES_VIEW: &str = "tables_view";
pub const STAFF_MANAGE: &str = "staff_manage";
pub const REPORTS_VIEW: &str = "reports_view";
pub const SETTINGS_MANAGE: &str = "settings_manage";
pub const PAYMENTS_PROCESS: &str = "payments_process";

pub const SUPER_ADMIN_PERMISSIONS: &[&str] = &[ALL];

pub const RESTAURANT_ADMIN_PERMISSIONS: &[&str] = &[
    ORDERS_VIEW,
    ORDERS_UPDATE,
    MENU_MANAGE,
    TABLES_MANAGE,
    STAFF_MANAGE,
    REPORTS_VIEW,
    SETTINGS_MANAGE,
];

pub const CASHIER_PERMISSIONS: &[&str] = &[ORDERS_VIEW, ORDERS_UPDATE, PAYMENTS_PROCESS];

pub const CHEF_PERMISSIONS: &[&str] = &[ORDERS_VIEW, ORDERS_UPDATE];

pub const WAITER_PERMISSIONS: &[&str] = &[ORDERS_VIEW, ORDERS_CREATE, TABLES_VIEW];

pub fn permissions_for(role: Role) -> &'static [&'static str] {
    match role {
        Role::SuperAdmin => SUPER_ADMIN_PERMISSIONS,
        Role::RestaurantAdmin => RESTAURANT_ADMIN_PERMISSIONS,
        Role::Cashier => CASHIER_PERMISSIONS,
        Role::Chef => CHEF_PERMISSIONS,
        Role::Waiter => WAITER_PERMISSIONS,
    }
}

pub fn role_has_permission(role: Role, permission: &str) -> bool {
    permissions_for(role)
        .iter()
        .any(|p| *p == ALL || *p == permission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_view_for_staff_roles() {
        for role in [Role::RestaurantAdmin, Role::Cashier, Role::Chef, Role::Waiter] {
            assert!(role_has_permission(role, ORDERS_VIEW), "{role} should view orders");
        }
    }

    #[test]
    fn test_super_admin_wildcard() {
        assert!(role_has_permission(Role::SuperAdmin, "anything_at_all"));
        assert!(role_has_permission(Role::SuperAdmin, PAYMENTS_PROCESS));
    }

    #[test]
    fn test_exact_match_only() {
        assert!(!role_has_permission(Role::Chef, TABLES_MANAGE));
        assert!(!role_has_permission(Role::Waiter, ORDERS_UPDATE));
        assert!(!role_has_permission(Role::Cashier, "orders"));
        assert!(role_has_permission(Role::Cashier, PAYMENTS_PROCESS));
        assert!(!role_has_permission(Role::RestaurantAdmin, PAYMENTS_PROCESS));
    }
}
