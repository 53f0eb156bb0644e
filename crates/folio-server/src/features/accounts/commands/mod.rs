//! Account write operations

pub mod login;
pub mod register;
pub mod signout;

pub use login::{LoginCommand, LoginError, LoginResponse};
pub use register::{RegisterCommand, RegisterError, RegisterResponse};
pub use signout::{SignoutError, SignoutResponse};
