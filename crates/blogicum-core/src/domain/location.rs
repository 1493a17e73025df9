use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Publication, Publishable};

/// Location entity - a named place a post can be tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub publication: Publication,
}

impl Location {
    pub fn new(name: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            publication: Publication::new(now),
        }
    }
}

impl Publishable for Location {
    fn publication(&self) -> &Publication {
        &self.publication
    }
}
