pub mod admin;
pub mod auth;
pub mod comments;
pub mod covers;
pub mod generation;
pub mod libraries;
pub mod likes;
pub mod works;
