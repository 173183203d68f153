//! Authentication and authorization
//!
//! - [`AuthService`] - sign-in / sign-up / token resolution over the gateway
//! - [`AuthState`] - signed-in user holder with a persisted token
//! - [`JwtService`] - session token codec
//! - [`CurrentUser`] - request user context
//! - [`require_auth`] / [`require_permission`] - middleware

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;
pub mod service;
pub mod state;

pub use extractor::CurrentUser;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_permission};
pub use service::{AuthError, AuthService, AuthSession};
pub use state::{AuthState, FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
