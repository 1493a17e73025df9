use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{max_chars, optional, required};
use crate::domain::{FIELD_MAX_LENGTH, Post, Publication};
use crate::error::FieldErrors;

/// Submitted post fields. Serialized as the prefill of the edit form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    pub pub_date: Option<DateTime<Utc>>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub image: Option<String>,
    pub is_published: Option<bool>,
}

/// Post fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    pub title: String,
    pub text: String,
    pub pub_date: Option<DateTime<Utc>>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub image: Option<String>,
    pub is_published: bool,
}

impl PostForm {
    pub fn validate(self) -> Result<PostInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = required(&mut errors, "title", &self.title);
        max_chars(&mut errors, "title", &title, FIELD_MAX_LENGTH);
        let text = required(&mut errors, "text", &self.text);

        errors.into_result(PostInput {
            title,
            text,
            pub_date: self.pub_date,
            category_id: self.category_id,
            location_id: self.location_id,
            image: optional(self.image),
            is_published: self.is_published.unwrap_or(true),
        })
    }

    /// Form prefilled from an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: Some(post.pub_date),
            category_id: post.category_id,
            location_id: post.location_id,
            image: post.image.clone(),
            is_published: Some(post.publication.is_published),
        }
    }
}

impl PostInput {
    /// New post by `author_id`; no `pub_date` means published right away.
    pub fn into_post(self, author_id: Uuid, now: DateTime<Utc>) -> Post {
        let mut publication = Publication::new(now);
        publication.is_published = self.is_published;

        Post {
            id: Uuid::new_v4(),
            title: self.title,
            text: self.text,
            pub_date: self.pub_date.unwrap_or(now),
            author_id,
            location_id: self.location_id,
            category_id: self.category_id,
            image: self.image,
            publication,
        }
    }

    /// Overwrite the editable fields of `post`. A missing `pub_date` keeps
    /// the current one.
    pub fn apply_to(self, post: &mut Post) {
        post.title = self.title;
        post.text = self.text;
        if let Some(pub_date) = self.pub_date {
            post.pub_date = pub_date;
        }
        post.category_id = self.category_id;
        post.location_id = self.location_id;
        post.image = self.image;
        post.publication.is_published = self.is_published;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn form(title: &str, text: &str) -> PostForm {
        PostForm {
            title: title.into(),
            text: text.into(),
            ..PostForm::default()
        }
    }

    #[test]
    fn test_title_and_text_are_required() {
        let errors = form("  ", "").validate().unwrap_err();

        assert_eq!(errors.get("title"), Some(&["This field is required.".to_string()][..]));
        assert!(errors.get("text").is_some());
        assert!(errors.get("category_id").is_none());
    }

    #[test]
    fn test_title_length_is_limited() {
        let errors = form(&"я".repeat(257), "body").validate().unwrap_err();
        assert_eq!(
            errors.get("title"),
            Some(&["Ensure this value has at most 256 characters (it has 257).".to_string()][..])
        );

        assert!(form(&"я".repeat(256), "body").validate().is_ok());
    }

    #[test]
    fn test_missing_pub_date_defaults_to_creation_time() {
        let now = Utc::now();
        let author = Uuid::new_v4();
        let post = form("Hello", "World").validate().unwrap().into_post(author, now);

        assert_eq!(post.pub_date, now);
        assert_eq!(post.publication.created_at, now);
        assert!(post.publication.is_published);
        assert_eq!(post.author_id, author);
    }

    #[test]
    fn test_scheduled_pub_date_is_kept() {
        let now = Utc::now();
        let later = now + TimeDelta::days(1);
        let mut scheduled = form("Hello", "World");
        scheduled.pub_date = Some(later);
        scheduled.image = Some("   ".into());

        let post = scheduled.validate().unwrap().into_post(Uuid::new_v4(), now);
        assert_eq!(post.pub_date, later);
        assert_eq!(post.image, None);
    }

    #[test]
    fn test_apply_keeps_pub_date_when_omitted() {
        let now = Utc::now();
        let mut post = Post::new(Uuid::new_v4(), "Old".into(), "Old".into(), now);
        let mut edit = form("New", "New text");
        edit.is_published = Some(false);

        edit.validate().unwrap().apply_to(&mut post);

        assert_eq!(post.title, "New");
        assert_eq!(post.pub_date, now);
        assert!(!post.publication.is_published);
    }
}
