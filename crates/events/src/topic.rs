//! Realtime topic names.

use std::fmt;
use std::str::FromStr;

use booksummary_core::types::DbId;

const WORK_PREFIX: &str = "ai_work_";
const LIBRARY_PREFIX: &str = "library_";
const WORKS_FEED: &str = "works_changes";

/// A channel a client can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Counter updates for one work: `ai_work_{id}`.
    Work(DbId),
    /// Stats updates for one library: `library_{id}`.
    Library(DbId),
    /// Every work update, for list pages: `works_changes`.
    WorksFeed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown topic '{0}'")]
pub struct UnknownTopic(pub String);

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Work(id) => write!(f, "{WORK_PREFIX}{id}"),
            Topic::Library(id) => write!(f, "{LIBRARY_PREFIX}{id}"),
            Topic::WorksFeed => f.write_str(WORKS_FEED),
        }
    }
}

impl FromStr for Topic {
    type Err = UnknownTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == WORKS_FEED {
            return Ok(Topic::WorksFeed);
        }
        let parse_id = |rest: &str| rest.parse::<DbId>().ok().filter(|id| *id > 0);
        if let Some(id) = s.strip_prefix(WORK_PREFIX).and_then(parse_id) {
            return Ok(Topic::Work(id));
        }
        if let Some(id) = s.strip_prefix(LIBRARY_PREFIX).and_then(parse_id) {
            return Ok(Topic::Library(id));
        }
        Err(UnknownTopic(s.to_string()))
    }
}
