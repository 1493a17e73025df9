use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Publication, Publishable};

/// Category entity - groups posts under a URL slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub slug: String,
    #[serde(flatten)]
    pub publication: Publication,
}

impl Category {
    /// Create a new published category.
    pub fn new(title: String, description: String, slug: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            slug,
            publication: Publication::new(now),
        }
    }
}

impl Publishable for Category {
    fn publication(&self) -> &Publication {
        &self.publication
    }
}
