//! Post visibility rules.
//!
//! A post is visible to the public when it is published, its `pub_date` has
//! passed and its category (if any) is published. Category gating overrides
//! the post's own state. The author always sees their own posts.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Post, Publishable};

/// Who is looking at a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(Uuid),
}

impl Viewer {
    pub fn is(&self, user_id: Uuid) -> bool {
        matches!(self, Self::User(id) if *id == user_id)
    }
}

impl From<Option<Uuid>> for Viewer {
    fn from(user_id: Option<Uuid>) -> Self {
        user_id.map_or(Self::Anonymous, Self::User)
    }
}

/// Filter mode applied to post collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only posts passing the public predicate at `now`.
    Public { now: DateTime<Utc> },
    /// Everything, including drafts, scheduled posts and hidden categories.
    Owner,
}

impl Visibility {
    /// Mode for `viewer` browsing posts written by `owner_id`.
    pub fn for_viewer(viewer: Viewer, owner_id: Uuid, now: DateTime<Utc>) -> Self {
        if viewer.is(owner_id) {
            Self::Owner
        } else {
            Self::Public { now }
        }
    }

    pub fn admits(&self, post: &Post, category: Option<&Category>) -> bool {
        match self {
            Self::Public { now } => is_publicly_visible(post, category, *now),
            Self::Owner => true,
        }
    }
}

/// The public-mode predicate.
///
/// `category` must be the row referenced by `post.category_id`.
pub fn is_publicly_visible(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.is_published() && post.pub_date <= now && category.is_none_or(Publishable::is_published)
}

/// Single-post rule: the author always, anyone else through the public predicate.
pub fn can_view(
    post: &Post,
    category: Option<&Category>,
    viewer: Viewer,
    now: DateTime<Utc>,
) -> bool {
    viewer.is(post.author_id) || is_publicly_visible(post, category, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn post_at(pub_date: DateTime<Utc>) -> Post {
        let mut post = Post::new(Uuid::new_v4(), "Title".into(), "Text".into(), pub_date);
        post.pub_date = pub_date;
        post
    }

    fn category(published: bool) -> Category {
        let mut category = Category::new("News".into(), "d".into(), "news".into(), now());
        category.publication.is_published = published;
        category
    }

    #[test]
    fn test_published_post_without_category_is_public() {
        let now = now();
        let post = post_at(now - TimeDelta::minutes(1));
        assert!(is_publicly_visible(&post, None, now));
    }

    #[test]
    fn test_pub_date_equal_to_now_is_public() {
        let now = now();
        let post = post_at(now);
        assert!(is_publicly_visible(&post, None, now));
    }

    #[test]
    fn test_future_post_is_hidden() {
        let now = now();
        let post = post_at(now + TimeDelta::days(1));
        assert!(!is_publicly_visible(&post, None, now));
    }

    #[test]
    fn test_draft_is_hidden() {
        let now = now();
        let mut post = post_at(now - TimeDelta::hours(1));
        post.publication.is_published = false;
        assert!(!is_publicly_visible(&post, Some(&category(true)), now));
    }

    #[test]
    fn test_unpublished_category_overrides_published_post() {
        let now = now();
        let post = post_at(now - TimeDelta::hours(1));
        assert!(is_publicly_visible(&post, Some(&category(true)), now));
        assert!(!is_publicly_visible(&post, Some(&category(false)), now));
    }

    #[test]
    fn test_author_can_view_hidden_post() {
        let now = now();
        let mut post = post_at(now + TimeDelta::days(3));
        post.publication.is_published = false;
        let hidden = category(false);

        assert!(can_view(&post, Some(&hidden), Viewer::User(post.author_id), now));
        assert!(!can_view(&post, Some(&hidden), Viewer::User(Uuid::new_v4()), now));
        assert!(!can_view(&post, Some(&hidden), Viewer::Anonymous, now));
    }

    #[test]
    fn test_visibility_for_viewer() {
        let owner = Uuid::new_v4();
        let now = now();

        assert_eq!(
            Visibility::for_viewer(Viewer::User(owner), owner, now),
            Visibility::Owner
        );
        assert_eq!(
            Visibility::for_viewer(Viewer::Anonymous, owner, now),
            Visibility::Public { now }
        );
        assert_eq!(
            Visibility::for_viewer(Viewer::User(Uuid::new_v4()), owner, now),
            Visibility::Public { now }
        );
    }

    #[test]
    fn test_owner_mode_admits_everything() {
        let now = now();
        let mut post = post_at(now + TimeDelta::days(1));
        post.publication.is_published = false;

        assert!(Visibility::Owner.admits(&post, Some(&category(false))));
        assert!(!Visibility::Public { now }.admits(&post, Some(&category(false))));
    }
}
