//! Author management: CRUD with avatar uploads
//!
//! Authors are addressed by id over HTTP but keyed by a unique slug derived
//! from "first_name last_name". The slug doubles as the storage base name
//! for the avatar object.

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::authors_routes;
pub use types::AuthorRecord;
