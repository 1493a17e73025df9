//! In-memory blog store - used when no database is configured, and in tests.
//!
//! All repositories handed out by one [`InMemoryStore`] share the same tables
//! and honour the same referential actions as the PostgreSQL schema: deleting
//! a user removes their posts and comments, deleting a post removes its
//! comments, deleting a category or location clears the reference on posts.
//! Data is lost on process restart.

mod repositories;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use blogicum_core::domain::{Author, Category, Comment, Location, Post, PostSummary, User};

pub use repositories::{
    InMemoryCategoryRepository, InMemoryCommentRepository, InMemoryLocationRepository,
    InMemoryPostRepository, InMemoryUserRepository,
};

#[derive(Default)]
pub(crate) struct Tables {
    pub(crate) users: HashMap<Uuid, User>,
    pub(crate) categories: HashMap<Uuid, Category>,
    pub(crate) locations: HashMap<Uuid, Location>,
    pub(crate) posts: HashMap<Uuid, Post>,
    pub(crate) comments: HashMap<Uuid, Comment>,
}

impl Tables {
    fn comment_count(&self, post_id: Uuid) -> u64 {
        self.comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .count() as u64
    }

    fn author(&self, user_id: Uuid) -> Option<Author> {
        self.users.get(&user_id).map(User::author)
    }

    /// Join a post with its author, category, location and comment count.
    fn summarize(&self, post: &Post) -> Option<PostSummary> {
        Some(PostSummary {
            post: post.clone(),
            author: self.author(post.author_id)?,
            category: post
                .category_id
                .and_then(|id| self.categories.get(&id).cloned()),
            location: post
                .location_id
                .and_then(|id| self.locations.get(&id).cloned()),
            comment_count: self.comment_count(post.id),
        })
    }

    fn remove_post(&mut self, post_id: Uuid) -> Option<Post> {
        let post = self.posts.remove(&post_id)?;
        self.comments.retain(|_, comment| comment.post_id != post_id);
        Some(post)
    }

    fn remove_user(&mut self, user_id: Uuid) -> Option<User> {
        let user = self.users.remove(&user_id)?;
        let owned: Vec<Uuid> = self
            .posts
            .values()
            .filter(|post| post.author_id == user_id)
            .map(|post| post.id)
            .collect();
        for post_id in owned {
            self.remove_post(post_id);
        }
        self.comments.retain(|_, comment| comment.author_id != user_id);
        Some(user)
    }

    fn remove_category(&mut self, category_id: Uuid) -> Option<Category> {
        let category = self.categories.remove(&category_id)?;
        for post in self.posts.values_mut() {
            if post.category_id == Some(category_id) {
                post.category_id = None;
            }
        }
        Some(category)
    }

    fn remove_location(&mut self, location_id: Uuid) -> Option<Location> {
        let location = self.locations.remove(&location_id)?;
        for post in self.posts.values_mut() {
            if post.location_id == Some(location_id) {
                post.location_id = None;
            }
        }
        Some(location)
    }
}

/// Shared in-memory tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository::new(self.tables.clone())
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository::new(self.tables.clone())
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository::new(self.tables.clone())
    }

    pub fn categories(&self) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository::new(self.tables.clone())
    }

    pub fn locations(&self) -> InMemoryLocationRepository {
        InMemoryLocationRepository::new(self.tables.clone())
    }
}
