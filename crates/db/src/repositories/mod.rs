//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod comment_repo;
pub mod interaction_repo;
pub mod library_repo;
pub mod profile_repo;
pub mod stats_repo;
pub mod work_repo;

pub use comment_repo::CommentRepo;
pub use interaction_repo::{InteractionRepo, PgInteractionStore};
pub use library_repo::LibraryRepo;
pub use profile_repo::ProfileRepo;
pub use stats_repo::StatsRepo;
pub use work_repo::WorkRepo;
