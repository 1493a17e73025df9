use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Author, Category, CommentView, Location, Publication, Publishable};

/// Post entity - a blog publication, possibly scheduled for later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    /// Publication moment. A future value schedules the post.
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    /// Reference to an uploaded image in the file store.
    pub image: Option<String>,
    #[serde(flatten)]
    pub publication: Publication,
}

impl Post {
    /// Create a new post published at `now`.
    pub fn new(author_id: Uuid, title: String, text: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            text,
            pub_date: now,
            author_id,
            location_id: None,
            category_id: None,
            image: None,
            publication: Publication::new(now),
        }
    }
}

impl Publishable for Post {
    fn publication(&self) -> &Publication {
        &self.publication
    }
}

/// A post joined with its author, category, location and live comment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub post: Post,
    pub author: Author,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}

/// A single post with its comment thread, oldest comment first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    pub summary: PostSummary,
    pub comments: Vec<CommentView>,
}
