//! Combined book/author search

pub mod queries;
pub mod routes;

pub use routes::search_routes;
