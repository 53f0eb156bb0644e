//! Book read operations

pub mod get;
pub mod list;

pub use get::{GetBookError, GetBookResponse};
pub use list::{ListBooksError, ListBooksQuery};
