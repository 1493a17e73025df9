//! Blog service - feeds, post detail and the post/comment/profile lifecycle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Category, Comment, Post, PostDetail, PostSummary, Publishable, User};
use crate::error::{DomainError, FieldErrors};
use crate::forms::{CommentForm, PostForm, PostInput, ProfileForm};
use crate::ownership::{Applied, Guarded, Mutation, Redirect, require_owner};
use crate::pagination::{Page, Paginator};
use crate::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostQuery, PostRepository,
    UserRepository,
};
use crate::visibility::{Viewer, Visibility, can_view};

/// Repositories the blog service reads and writes.
#[derive(Clone)]
pub struct BlogRepositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
}

/// A published category and one page of its public posts.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryFeed {
    pub category: Category,
    pub page: Page<PostSummary>,
}

/// A user and one page of the posts the viewer may see.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileFeed {
    pub user: User,
    pub page: Page<PostSummary>,
}

#[derive(Clone)]
pub struct BlogService {
    repos: BlogRepositories,
    paginator: Paginator,
    clock: Arc<dyn Clock>,
}

impl BlogService {
    pub fn new(repos: BlogRepositories, paginator: Paginator, clock: Arc<dyn Clock>) -> Self {
        Self {
            repos,
            paginator,
            clock,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    async fn paginate(
        &self,
        query: &PostQuery,
        page: Option<&str>,
    ) -> Result<Page<PostSummary>, DomainError> {
        let total = self.repos.posts.count(query).await?;
        let window = self.paginator.window(page, total);
        let items = self.repos.posts.find_page(query, window).await?;
        Ok(self.paginator.page(window, total, items))
    }

    /// The authenticated requester, who must still exist.
    async fn current_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.repos
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Unauthorized)
    }

    async fn load_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    async fn load_summary(&self, post_id: Uuid) -> Result<PostSummary, DomainError> {
        self.repos
            .posts
            .find_summary(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    /// A comment addressed through its post; a comment of another post is not found.
    async fn load_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<Comment, DomainError> {
        self.load_post(post_id).await?;
        self.repos
            .comments
            .find_by_id(comment_id)
            .await?
            .filter(|comment| comment.post_id == post_id)
            .ok_or_else(|| DomainError::not_found("comment", comment_id))
    }

    /// Category and location must reference existing rows.
    async fn check_references(&self, input: &PostInput) -> Result<(), DomainError> {
        let mut errors = FieldErrors::new();
        if let Some(category_id) = input.category_id {
            if self.repos.categories.find_by_id(category_id).await?.is_none() {
                errors.add("category_id", "Select a valid choice.");
            }
        }
        if let Some(location_id) = input.location_id {
            if self.repos.locations.find_by_id(location_id).await?.is_none() {
                errors.add("location_id", "Select a valid choice.");
            }
        }
        errors.into_result(()).map_err(DomainError::from)
    }

    // ---- feeds ----

    /// Home feed: every publicly visible post.
    pub async fn home_feed(&self, page: Option<&str>) -> Result<Page<PostSummary>, DomainError> {
        self.paginate(&PostQuery::published(self.now()), page).await
    }

    /// Public posts of a published category. Hidden categories are not found,
    /// whoever asks.
    pub async fn category_feed(
        &self,
        slug: &str,
        page: Option<&str>,
    ) -> Result<CategoryFeed, DomainError> {
        let category = self
            .repos
            .categories
            .find_by_slug(slug)
            .await?
            .filter(Publishable::is_published)
            .ok_or_else(|| DomainError::not_found("category", slug))?;

        let query = PostQuery::published(self.now()).in_category(category.id);
        let page = self.paginate(&query, page).await?;
        Ok(CategoryFeed { category, page })
    }

    /// Posts of `username`: everything for the owner, the public subset for others.
    pub async fn profile(
        &self,
        viewer: Viewer,
        username: &str,
        page: Option<&str>,
    ) -> Result<ProfileFeed, DomainError> {
        let user = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let visibility = Visibility::for_viewer(viewer, user.id, self.now());
        let page = self
            .paginate(&PostQuery::by_author(user.id, visibility), page)
            .await?;
        Ok(ProfileFeed { user, page })
    }

    /// A post with its comments. Invisible posts are reported as not found.
    pub async fn post_detail(
        &self,
        viewer: Viewer,
        post_id: Uuid,
    ) -> Result<PostDetail, DomainError> {
        let summary = self.load_summary(post_id).await?;
        if !can_view(&summary.post, summary.category.as_ref(), viewer, self.now()) {
            tracing::debug!(post_id = %post_id, "Post hidden from viewer");
            return Err(DomainError::not_found("post", post_id));
        }

        let comments = self.repos.comments.find_by_post(post_id).await?;
        Ok(PostDetail { summary, comments })
    }

    // ---- posts ----

    pub async fn create_post(
        &self,
        requester: Uuid,
        form: PostForm,
    ) -> Result<Applied<Post>, DomainError> {
        let author = self.current_user(requester).await?;
        let input = form.validate()?;
        self.check_references(&input).await?;

        let post = self
            .repos
            .posts
            .insert(input.into_post(author.id, self.now()))
            .await?;
        tracing::info!(post_id = %post.id, author = %author.username, "Post created");

        Ok(Applied::new(
            post,
            Redirect::Profile {
                username: author.username,
            },
        ))
    }

    /// Current values of a post for its edit form.
    pub async fn post_for_edit(
        &self,
        requester: Uuid,
        post_id: Uuid,
    ) -> Result<Guarded<Post>, DomainError> {
        let post = self.load_post(post_id).await?;
        Ok(match require_owner(requester, &post, || Redirect::PostDetail { post_id }) {
            Ok(()) => Guarded::Allowed(post),
            Err(redirect) => Guarded::Redirected(redirect),
        })
    }

    pub async fn edit_post(
        &self,
        requester: Uuid,
        post_id: Uuid,
        form: PostForm,
    ) -> Result<Mutation<Post>, DomainError> {
        let mut post = self.load_post(post_id).await?;
        if let Err(redirect) =
            require_owner(requester, &post, || Redirect::PostDetail { post_id })
        {
            return Ok(Guarded::Redirected(redirect));
        }

        let input = form.validate()?;
        self.check_references(&input).await?;
        input.apply_to(&mut post);

        let post = self.repos.posts.update(post).await?;
        tracing::info!(post_id = %post.id, "Post updated");
        Ok(Guarded::Allowed(Applied::new(
            post,
            Redirect::PostDetail { post_id },
        )))
    }

    /// Delete confirmation view; nothing is removed.
    pub async fn post_for_delete(
        &self,
        requester: Uuid,
        post_id: Uuid,
    ) -> Result<Guarded<PostSummary>, DomainError> {
        let summary = self.load_summary(post_id).await?;
        Ok(
            match require_owner(requester, &summary.post, || Redirect::PostDetail { post_id }) {
                Ok(()) => Guarded::Allowed(summary),
                Err(redirect) => Guarded::Redirected(redirect),
            },
        )
    }

    /// Delete a post together with its comments.
    pub async fn delete_post(
        &self,
        requester: Uuid,
        post_id: Uuid,
    ) -> Result<Mutation<Post>, DomainError> {
        let post = self.load_post(post_id).await?;
        if let Err(redirect) =
            require_owner(requester, &post, || Redirect::PostDetail { post_id })
        {
            return Ok(Guarded::Redirected(redirect));
        }
        let author = self.current_user(requester).await?;

        self.repos.posts.delete(post_id).await?;
        tracing::info!(post_id = %post_id, author = %author.username, "Post deleted");

        Ok(Guarded::Allowed(Applied::new(
            post,
            Redirect::Profile {
                username: author.username,
            },
        )))
    }

    // ---- comments ----

    /// Comment on a post the requester can see.
    pub async fn add_comment(
        &self,
        requester: Uuid,
        post_id: Uuid,
        form: CommentForm,
    ) -> Result<Applied<Comment>, DomainError> {
        let summary = self.load_summary(post_id).await?;
        let now = self.now();
        if !can_view(&summary.post, summary.category.as_ref(), Viewer::User(requester), now) {
            return Err(DomainError::not_found("post", post_id));
        }
        let author = self.current_user(requester).await?;
        let input = form.validate()?;

        let comment = self
            .repos
            .comments
            .insert(Comment::new(post_id, author.id, input.text, now))
            .await?;
        tracing::info!(post_id = %post_id, comment_id = %comment.id, "Comment added");

        Ok(Applied::new(comment, Redirect::PostDetail { post_id }))
    }

    pub async fn comment_for_edit(
        &self,
        requester: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Guarded<Comment>, DomainError> {
        let comment = self.load_comment(post_id, comment_id).await?;
        Ok(match require_owner(requester, &comment, || Redirect::PostDetail { post_id }) {
            Ok(()) => Guarded::Allowed(comment),
            Err(redirect) => Guarded::Redirected(redirect),
        })
    }

    pub async fn edit_comment(
        &self,
        requester: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
        form: CommentForm,
    ) -> Result<Mutation<Comment>, DomainError> {
        let mut comment = self.load_comment(post_id, comment_id).await?;
        if let Err(redirect) =
            require_owner(requester, &comment, || Redirect::PostDetail { post_id })
        {
            return Ok(Guarded::Redirected(redirect));
        }

        comment.text = form.validate()?.text;
        let comment = self.repos.comments.update(comment).await?;
        Ok(Guarded::Allowed(Applied::new(
            comment,
            Redirect::PostDetail { post_id },
        )))
    }

    /// Same lookup and guard as deletion, without removing anything.
    pub async fn comment_for_delete(
        &self,
        requester: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Guarded<Comment>, DomainError> {
        self.comment_for_edit(requester, post_id, comment_id).await
    }

    pub async fn delete_comment(
        &self,
        requester: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Mutation<Comment>, DomainError> {
        let comment = self.load_comment(post_id, comment_id).await?;
        if let Err(redirect) =
            require_owner(requester, &comment, || Redirect::PostDetail { post_id })
        {
            return Ok(Guarded::Redirected(redirect));
        }

        self.repos.comments.delete(comment_id).await?;
        tracing::info!(post_id = %post_id, comment_id = %comment_id, "Comment deleted");
        Ok(Guarded::Allowed(Applied::new(
            comment,
            Redirect::PostDetail { post_id },
        )))
    }

    // ---- profile ----

    pub async fn profile_for_edit(&self, requester: Uuid) -> Result<User, DomainError> {
        self.current_user(requester).await
    }

    /// Update the requester's own profile. Usernames stay unique.
    pub async fn edit_profile(
        &self,
        requester: Uuid,
        form: ProfileForm,
    ) -> Result<Applied<User>, DomainError> {
        let mut user = self.current_user(requester).await?;
        let input = form.validate()?;

        if input.username != user.username {
            let taken = self.repos.users.find_by_username(&input.username).await?;
            if taken.is_some_and(|other| other.id != user.id) {
                let mut errors = FieldErrors::new();
                errors.add("username", "A user with that username already exists.");
                return Err(errors.into());
            }
        }

        input.apply_to(&mut user);
        let user = self.repos.users.update(user).await?;
        tracing::info!(user_id = %user.id, "Profile updated");

        let next = Redirect::Profile {
            username: user.username.clone(),
        };
        Ok(Applied::new(user, next))
    }
}
