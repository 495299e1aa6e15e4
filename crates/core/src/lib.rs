//! Domain rules for the 북서머리 publishing service.
//!
//! Everything in this crate is free of I/O: the database, HTTP and
//! realtime layers call into these modules for validation, ordering rules,
//! and the like/view counting state machines.

pub mod account;
pub mod comment;
pub mod counter;
pub mod cover;
pub mod error;
pub mod generation;
pub mod interaction;
pub mod library;
pub mod roles;
pub mod search;
pub mod types;
pub mod work;
