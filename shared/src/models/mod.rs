//! Data models
//!
//! Typed rows for every table the data gateway exposes. Gateway responses
//! are decoded into these structs at the boundary; nothing inward handles
//! raw JSON rows. All IDs are opaque strings.

pub mod category;
pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod restaurant;
pub mod role;
pub mod user;

// Re-exports
pub use category::*;
pub use dining_table::*;
pub use menu_item::*;
pub use order::*;
pub use restaurant::*;
pub use role::*;
pub use user::*;
