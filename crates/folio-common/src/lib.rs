//! Folio Common Library
//!
//! Shared types and utilities for the Folio workspace:
//!
//! - **Logging**: `tracing` subscriber setup shared by every binary
//! - **Slugs**: URL-safe identifier derivation for authors and books

pub mod logging;
pub mod slug;
