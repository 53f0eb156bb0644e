//! Book management: CRUD with cover and book-file uploads
//!
//! A book's availability status is never trusted from the caller alone;
//! [`status`] derives the persisted value from whether a book file is
//! actually attached.

pub mod commands;
pub mod queries;
pub mod routes;
pub mod status;
pub mod types;

pub use routes::books_routes;
pub use status::BookStatus;
pub use types::BookRecord;
