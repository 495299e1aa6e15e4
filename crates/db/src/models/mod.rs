//! Row structs and DTOs.
//!
//! Each submodule holds a `FromRow` entity matching the table, plus the
//! create/update DTOs the repositories accept.

pub mod comment;
pub mod interaction;
pub mod library;
pub mod profile;
pub mod stats;
pub mod work;
