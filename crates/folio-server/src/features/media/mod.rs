//! Media replacement for existing authors and books

pub mod commands;
pub mod routes;

pub use routes::media_routes;
