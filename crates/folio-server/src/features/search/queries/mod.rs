//! Search read operations

pub mod search;

pub use search::{SearchError, SearchQuery, SearchResponse};
