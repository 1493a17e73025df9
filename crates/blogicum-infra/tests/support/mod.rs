//! Shared fixtures: an in-memory store, a controllable clock and seed helpers.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use blogicum_core::domain::{Category, Comment, Location, Post, PostSummary, User};
use blogicum_core::pagination::Paginator;
use blogicum_core::ports::BaseRepository;
use blogicum_core::services::{BlogRepositories, BlogService, CatalogueService};
use blogicum_infra::InMemoryStore;

pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.lock_clock();
        *now += delta;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// Blog services over one in-memory store.
pub struct World {
    pub store: InMemoryStore,
    pub clock: Arc<MutableClock>,
    pub blog: BlogService,
    pub catalogue: CatalogueService,
}

impl World {
    pub fn new() -> Self {
        Self::with_page_size(10)
    }

    pub fn with_page_size(per_page: u64) -> Self {
        let store = InMemoryStore::new();
        let clock = Arc::new(MutableClock::new(epoch()));
        let repos = BlogRepositories {
            users: Arc::new(store.users()),
            posts: Arc::new(store.posts()),
            comments: Arc::new(store.comments()),
            categories: Arc::new(store.categories()),
            locations: Arc::new(store.locations()),
        };
        let blog = BlogService::new(repos, Paginator::new(per_page), clock.clone());
        let catalogue = CatalogueService::new(
            Arc::new(store.categories()),
            Arc::new(store.locations()),
            clock.clone(),
        );

        Self {
            store,
            clock,
            blog,
            catalogue,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    pub async fn user(&self, username: &str) -> User {
        self.store
            .users()
            .insert(User::new(username.into(), "hash".into(), self.now()))
            .await
            .unwrap()
    }

    pub async fn category(&self, slug: &str, is_published: bool) -> Category {
        let mut category = Category::new(
            slug.to_uppercase(),
            "about".into(),
            slug.into(),
            self.now(),
        );
        category.publication.is_published = is_published;
        self.store.categories().insert(category).await.unwrap()
    }

    pub async fn location(&self, name: &str) -> Location {
        self.store
            .locations()
            .insert(Location::new(name.into(), self.now()))
            .await
            .unwrap()
    }

    /// A published post dated `offset` from now.
    pub async fn post(&self, author: &User, title: &str, offset: TimeDelta) -> Post {
        let mut post = Post::new(author.id, title.into(), "body".into(), self.now());
        post.pub_date = self.now() + offset;
        self.store.posts().insert(post).await.unwrap()
    }

    pub async fn save_post(&self, post: Post) -> Post {
        self.store.posts().update(post).await.unwrap()
    }

    pub async fn comment(&self, author: &User, post: &Post, text: &str) -> Comment {
        self.store
            .comments()
            .insert(Comment::new(post.id, author.id, text.into(), self.now()))
            .await
            .unwrap()
    }
}

pub fn hours(n: i64) -> TimeDelta {
    TimeDelta::hours(n)
}

pub fn titles<'a>(items: impl IntoIterator<Item = &'a PostSummary>) -> Vec<String> {
    items.into_iter().map(|s| s.post.title.clone()).collect()
}

pub fn missing() -> Uuid {
    Uuid::new_v4()
}
