use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication state shared by categories, locations and posts.
///
/// Entities embed this field set instead of inheriting it; the [`Publishable`]
/// trait gives uniform read access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Publication {
    /// A published record created at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            is_published: true,
            created_at: now,
        }
    }
}

/// An entity that can be hidden with an `is_published` flag.
pub trait Publishable {
    fn publication(&self) -> &Publication;

    fn is_published(&self) -> bool {
        self.publication().is_published
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.publication().created_at
    }
}
