//! Author read operations

pub mod get;
pub mod list;

pub use get::{GetAuthorError, GetAuthorResponse};
pub use list::{ListAuthorsError, ListAuthorsQuery};
