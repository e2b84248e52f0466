//! Credential handling: password hashing and bearer-token issuance.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenError, TokenKeys};
