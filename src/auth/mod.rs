//! Admin authentication: password hashing, bearer tokens and the access gate

pub mod gate;
pub mod password;
pub mod token;

pub use gate::AccessGate;
pub use token::{Claims, TokenService, DEFAULT_TTL_MINUTES};
