//! Account management: registration, login, session probe, signout

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::{public_routes, session_probe_routes, session_routes};
