//! Well-known role name constants.
//!
//! These must match the `chk_profiles_role` constraint in the profiles migration.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Whether `role` may manage content it does not own.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}
