//! Author write operations

pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateAuthorCommand, CreateAuthorError};
pub use delete::{DeleteAuthorError, DeleteAuthorResponse};
pub use update::{UpdateAuthorCommand, UpdateAuthorError};
