//! Media write operations

pub mod replace;

pub use replace::{MediaGroup, ReplaceMediaCommand, ReplaceMediaError, ReplaceMediaResponse};
