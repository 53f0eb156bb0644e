//! Feature modules implementing the library API
//!
//! Each feature is a vertical slice with its own commands, queries, and
//! routes:
//!
//! - **accounts**: registration, login, session probe, signout
//! - **authors**: author CRUD with avatar uploads
//! - **books**: book CRUD with cover and book-file uploads
//! - **search**: combined book/author search
//! - **media**: replacing stored media for existing records
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (create, update, delete)
//! - `queries/` - Read operations (get, list)
//! - `routes.rs` - HTTP route definitions and error mapping
//!
//! Commands and queries are plain structs with `validate()` methods handled
//! by standalone async functions, keeping business logic testable without
//! the HTTP layer.

pub mod accounts;
pub mod authors;
pub mod books;
pub mod media;
pub mod search;
pub mod shared;

use axum::{middleware, Router};

use crate::auth::{optional_auth, require_auth};
use crate::config::AuthConfig;
use crate::storage::Storage;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// PostgreSQL connection pool
    pub db: sqlx::PgPool,
    /// S3-compatible storage backend for uploaded media
    pub storage: Storage,
    /// Token signing configuration
    pub auth: AuthConfig,
}

/// Creates the main API router with all feature routes mounted
///
/// `/register` and `/login` are public. `/auth` runs behind `optional_auth`
/// so it can report the session state without rejecting anonymous callers.
/// Everything else requires a valid bearer token.
pub fn router(state: FeatureState) -> Router<()> {
    let public = Router::new().merge(accounts::public_routes()).merge(
        accounts::session_probe_routes()
            .layer(middleware::from_fn_with_state(state.clone(), optional_auth)),
    );

    let protected = Router::new()
        .nest("/authors", authors::authors_routes())
        .nest("/books", books::books_routes())
        .merge(search::search_routes())
        .merge(media::media_routes())
        .merge(accounts::session_routes())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected).with_state(state)
}
