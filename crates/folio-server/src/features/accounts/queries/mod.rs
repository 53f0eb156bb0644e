//! Account read operations

pub mod session;

pub use session::{SessionError, SessionResponse};
