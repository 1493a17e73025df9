use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blogicum_core::domain::{Category, Comment, CommentView, Location, Post, PostSummary, User};
use blogicum_core::error::RepoError;
use blogicum_core::pagination::PageWindow;
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostQuery,
    PostRepository, UserRepository,
};

use super::Tables;

/// Repository handle over one table, with the CRUD operations of [`BaseRepository`].
macro_rules! in_memory_repository {
    ($repo:ident, $entity:ty, $table:ident, $remove:ident, $check:path) => {
        pub struct $repo {
            tables: Arc<RwLock<Tables>>,
        }

        impl $repo {
            pub(crate) fn new(tables: Arc<RwLock<Tables>>) -> Self {
                Self { tables }
            }
        }

        #[async_trait]
        impl BaseRepository<$entity, Uuid> for $repo {
            async fn find_by_id(&self, id: Uuid) -> Result<Option<$entity>, RepoError> {
                Ok(self.tables.read().await.$table.get(&id).cloned())
            }

            async fn insert(&self, entity: $entity) -> Result<$entity, RepoError> {
                let mut tables = self.tables.write().await;
                if tables.$table.contains_key(&entity.id) {
                    return Err(RepoError::Unique("Entity already exists".to_string()));
                }
                $check(&tables, &entity)?;
                tables.$table.insert(entity.id, entity.clone());
                Ok(entity)
            }

            async fn update(&self, entity: $entity) -> Result<$entity, RepoError> {
                let mut tables = self.tables.write().await;
                if !tables.$table.contains_key(&entity.id) {
                    return Err(RepoError::NotFound);
                }
                $check(&tables, &entity)?;
                tables.$table.insert(entity.id, entity.clone());
                Ok(entity)
            }

            async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
                self.tables
                    .write()
                    .await
                    .$remove(id)
                    .map(|_| ())
                    .ok_or(RepoError::NotFound)
            }
        }
    };
}

fn unique_username(tables: &Tables, user: &User) -> Result<(), RepoError> {
    let taken = tables
        .users
        .values()
        .any(|other| other.id != user.id && other.username == user.username);
    if taken {
        return Err(RepoError::Unique(format!(
            "username '{}' already exists",
            user.username
        )));
    }
    Ok(())
}

fn unique_slug(tables: &Tables, category: &Category) -> Result<(), RepoError> {
    let taken = tables
        .categories
        .values()
        .any(|other| other.id != category.id && other.slug == category.slug);
    if taken {
        return Err(RepoError::Unique(format!(
            "slug '{}' already exists",
            category.slug
        )));
    }
    Ok(())
}

fn no_constraints(_tables: &Tables, _location: &Location) -> Result<(), RepoError> {
    Ok(())
}

fn post_references(tables: &Tables, post: &Post) -> Result<(), RepoError> {
    let dangling = !tables.users.contains_key(&post.author_id)
        || post
            .category_id
            .is_some_and(|id| !tables.categories.contains_key(&id))
        || post
            .location_id
            .is_some_and(|id| !tables.locations.contains_key(&id));
    if dangling {
        return Err(RepoError::ForeignKey(
            "post references a missing row".to_string(),
        ));
    }
    Ok(())
}

fn comment_references(tables: &Tables, comment: &Comment) -> Result<(), RepoError> {
    if !tables.posts.contains_key(&comment.post_id)
        || !tables.users.contains_key(&comment.author_id)
    {
        return Err(RepoError::ForeignKey(
            "comment references a missing row".to_string(),
        ));
    }
    Ok(())
}

in_memory_repository!(InMemoryUserRepository, User, users, remove_user, unique_username);
in_memory_repository!(
    InMemoryCategoryRepository,
    Category,
    categories,
    remove_category,
    unique_slug
);
in_memory_repository!(
    InMemoryLocationRepository,
    Location,
    locations,
    remove_location,
    no_constraints
);
in_memory_repository!(InMemoryPostRepository, Post, posts, remove_post, post_references);
in_memory_repository!(
    InMemoryCommentRepository,
    Comment,
    comments,
    remove_comment,
    comment_references
);

impl Tables {
    fn remove_comment(&mut self, comment_id: Uuid) -> Option<Comment> {
        self.comments.remove(&comment_id)
    }

    /// Posts matching `query`, newest `pub_date` first. Ties fall back to
    /// descending id so that paging is stable.
    fn matching(&self, query: &PostQuery) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .values()
            .filter(|post| query.author_id.is_none_or(|id| post.author_id == id))
            .filter(|post| query.category_id.is_none_or(|id| post.category_id == Some(id)))
            .filter(|post| {
                let category = post.category_id.and_then(|id| self.categories.get(&id));
                query.visibility.admits(post, category)
            })
            .collect();
        posts.sort_by(|a, b| {
            b.pub_date
                .cmp(&a.pub_date)
                .then_with(|| b.id.cmp(&a.id))
        });
        posts
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .find(|category| category.slug == slug)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let mut categories: Vec<Category> =
            self.tables.read().await.categories.values().cloned().collect();
        categories.sort_by(|a, b| b.title.cmp(&a.title).then_with(|| b.id.cmp(&a.id)));
        Ok(categories)
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocationRepository {
    async fn list(&self) -> Result<Vec<Location>, RepoError> {
        let mut locations: Vec<Location> =
            self.tables.read().await.locations.values().cloned().collect();
        locations.sort_by(|a, b| b.name.cmp(&a.name).then_with(|| b.id.cmp(&a.id)));
        Ok(locations)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.matching(query).len() as u64)
    }

    async fn find_page(
        &self,
        query: &PostQuery,
        window: PageWindow,
    ) -> Result<Vec<PostSummary>, RepoError> {
        let tables = self.tables.read().await;
        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);

        Ok(tables
            .matching(query)
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|post| tables.summarize(post))
            .collect())
    }

    async fn find_summary(&self, id: Uuid) -> Result<Option<PostSummary>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).and_then(|post| tables.summarize(post)))
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<CommentView> = tables
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .filter_map(|comment| {
                Some(CommentView {
                    comment: comment.clone(),
                    author: tables.author(comment.author_id)?,
                })
            })
            .collect();
        comments.sort_by_key(|view| (view.comment.created_at, view.comment.id));
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};

    use super::super::InMemoryStore;
    use super::*;

    async fn seed_user(store: &InMemoryStore, username: &str) -> User {
        store
            .users()
            .insert(User::new(username.into(), "hash".into(), Utc::now()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_unique_username() {
        let store = InMemoryStore::new();
        seed_user(&store, "anna").await;

        let duplicate = store
            .users()
            .insert(User::new("anna".into(), "hash".into(), Utc::now()))
            .await;
        assert!(matches!(duplicate, Err(RepoError::Unique(_))));
    }

    #[tokio::test]
    async fn test_dangling_reference_is_a_foreign_key_error() {
        let store = InMemoryStore::new();
        let author = seed_user(&store, "anna").await;
        let mut post = Post::new(author.id, "t".into(), "x".into(), Utc::now());
        post.category_id = Some(Uuid::new_v4());

        let result = store.posts().insert(post).await;

        assert!(matches!(result, Err(RepoError::ForeignKey(_))));
    }

    #[tokio::test]
    async fn test_deleting_post_removes_its_comments() {
        let store = InMemoryStore::new();
        let author = seed_user(&store, "anna").await;
        let post = store
            .posts()
            .insert(Post::new(author.id, "t".into(), "x".into(), Utc::now()))
            .await
            .unwrap();
        for text in ["one", "two"] {
            store
                .comments()
                .insert(Comment::new(post.id, author.id, text.into(), Utc::now()))
                .await
                .unwrap();
        }
        assert_eq!(store.comments().find_by_post(post.id).await.unwrap().len(), 2);

        store.posts().delete(post.id).await.unwrap();

        assert!(store.tables.read().await.comments.is_empty());
    }

    #[tokio::test]
    async fn test_deleting_category_clears_post_reference() {
        let store = InMemoryStore::new();
        let author = seed_user(&store, "anna").await;
        let category = store
            .categories()
            .insert(Category::new("News".into(), "d".into(), "news".into(), Utc::now()))
            .await
            .unwrap();
        let mut post = Post::new(author.id, "t".into(), "x".into(), Utc::now());
        post.category_id = Some(category.id);
        let post = store.posts().insert(post).await.unwrap();

        store.categories().delete(category.id).await.unwrap();

        let reloaded = store.posts().find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(reloaded.category_id, None);
    }

    #[tokio::test]
    async fn test_feed_order_and_window() {
        let store = InMemoryStore::new();
        let author = seed_user(&store, "anna").await;
        let now = Utc::now();
        for hours in [3, 1, 2] {
            let mut post = Post::new(author.id, format!("{hours}h ago"), "x".into(), now);
            post.pub_date = now - TimeDelta::hours(hours);
            store.posts().insert(post).await.unwrap();
        }

        let query = PostQuery::published(now);
        let window = PageWindow {
            number: 1,
            offset: 1,
            limit: 5,
        };
        let titles: Vec<String> = store
            .posts()
            .find_page(&query, window)
            .await
            .unwrap()
            .into_iter()
            .map(|summary| summary.post.title)
            .collect();

        assert_eq!(titles, vec!["2h ago", "3h ago"]);
    }

    #[tokio::test]
    async fn test_comments_are_listed_oldest_first() {
        let store = InMemoryStore::new();
        let author = seed_user(&store, "anna").await;
        let now = Utc::now();
        let post = store
            .posts()
            .insert(Post::new(author.id, "t".into(), "x".into(), now))
            .await
            .unwrap();
        store
            .comments()
            .insert(Comment::new(post.id, author.id, "second".into(), now))
            .await
            .unwrap();
        store
            .comments()
            .insert(Comment::new(
                post.id,
                author.id,
                "first".into(),
                now - TimeDelta::minutes(5),
            ))
            .await
            .unwrap();

        let texts: Vec<String> = store
            .comments()
            .find_by_post(post.id)
            .await
            .unwrap()
            .into_iter()
            .map(|view| view.comment.text)
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_comments_with_equal_timestamps_follow_id() {
        let store = InMemoryStore::new();
        let author = seed_user(&store, "anna").await;
        let now = Utc::now();
        let post = store
            .posts()
            .insert(Post::new(author.id, "t".into(), "x".into(), now))
            .await
            .unwrap();
        for n in 0..20 {
            store
                .comments()
                .insert(Comment::new(post.id, author.id, format!("c{n}"), now))
                .await
                .unwrap();
        }

        let ids: Vec<Uuid> = store
            .comments()
            .find_by_post(post.id)
            .await
            .unwrap()
            .into_iter()
            .map(|view| view.comment.id)
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
