use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Comment, CommentView, Location, Post, PostSummary, User};
use crate::error::RepoError;
use crate::pagination::PageWindow;
use crate::visibility::Visibility;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// All categories, title descending.
    async fn list(&self) -> Result<Vec<Category>, RepoError>;
}

#[async_trait]
pub trait LocationRepository: BaseRepository<Location, Uuid> {
    /// All locations, name descending.
    async fn list(&self) -> Result<Vec<Location>, RepoError>;
}

/// Selection of posts for a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostQuery {
    pub visibility: Visibility,
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

impl PostQuery {
    /// Every post passing the public predicate at `now`.
    pub fn published(now: DateTime<Utc>) -> Self {
        Self {
            visibility: Visibility::Public { now },
            author_id: None,
            category_id: None,
        }
    }

    /// Posts written by `author_id`, filtered by `visibility`.
    pub fn by_author(author_id: Uuid, visibility: Visibility) -> Self {
        Self {
            visibility,
            author_id: Some(author_id),
            category_id: None,
        }
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Post repository.
///
/// Feed results are ordered by `pub_date` descending and carry the live
/// comment count.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError>;

    async fn find_page(
        &self,
        query: &PostQuery,
        window: PageWindow,
    ) -> Result<Vec<PostSummary>, RepoError>;

    /// A single post joined with author, category, location and comment count.
    async fn find_summary(&self, id: Uuid) -> Result<Option<PostSummary>, RepoError>;
}

/// Comment repository. Deleting a post removes its comments at the store level.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments of a post with their authors, oldest first.
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError>;
}
