//! Bearer-token authentication
//!
//! Token issuance and validation live in [`jwt`]; the axum middleware that
//! gates protected routes lives in [`middleware`]. Signout works by
//! revocation: the token's `jti` is written to `revoked_tokens` and every
//! subsequent validation checks that table.

pub mod jwt;
pub mod middleware;

pub use jwt::{generate_token, validate_token, AuthError, Claims};
pub use middleware::{optional_auth, require_auth, AuthUser};
