//! Helpers shared across feature slices

pub mod pagination;
pub mod upload;
pub mod validation;
