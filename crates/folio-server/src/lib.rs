//! Folio Server Library
//!
//! HTTP server for a digital library: authors, books, media attachments,
//! search, and bearer-token authentication.
//!
//! # Architecture
//!
//! Each feature is a vertical slice under [`features`] with its own
//! `commands/` (write operations), `queries/` (read operations), and
//! `routes.rs`. Handlers are standalone async functions taking the shared
//! state they need; SQL lives inline in the handlers.
//!
//! The one piece of domain logic beyond CRUD is the book status resolver
//! (`features::books::status`): a book without an attached file is always
//! persisted as `Unavailable`.
//!
//! Mutations that touch both the blob store and the database compensate on
//! partial failure: blobs uploaded during a failed operation are deleted
//! before the error is returned.
//!
//! # Framework Stack
//!
//! - **Axum**: routing and extraction
//! - **SQLx**: PostgreSQL persistence
//! - **AWS SDK**: S3-compatible blob storage
//! - **Tower**: middleware

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod features;
pub mod storage;
