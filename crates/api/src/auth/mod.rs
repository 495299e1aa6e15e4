//! Account credentials.
//!
//! - [`password`]: Argon2id hashing and verification.
//! - [`jwt`]: HS256 access tokens.

pub mod jwt;
pub mod password;
