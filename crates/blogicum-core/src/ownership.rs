//! Ownership guard for post and comment mutations.
//!
//! Non-owners are not shown an error: the guard yields a [`Redirect`] to the
//! resource's read-only view and the transport sends the client there.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Comment, Post};

/// A resource with a single author.
pub trait Authored {
    fn author_id(&self) -> Uuid;
}

impl Authored for Post {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

/// A view the client should be sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Redirect {
    Profile { username: String },
    PostDetail { post_id: Uuid },
}

/// Result of a guarded read (edit form, delete confirmation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    Allowed(T),
    Redirected(Redirect),
}

impl<T> Guarded<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Guarded<U> {
        match self {
            Self::Allowed(value) => Guarded::Allowed(f(value)),
            Self::Redirected(redirect) => Guarded::Redirected(redirect),
        }
    }
}

/// A mutation that went through, and where to go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied<T> {
    pub value: T,
    pub next: Redirect,
}

impl<T> Applied<T> {
    pub fn new(value: T, next: Redirect) -> Self {
        Self { value, next }
    }
}

/// Result of a guarded mutation.
pub type Mutation<T> = Guarded<Applied<T>>;

pub fn is_owner(requester: Uuid, resource: &impl Authored) -> bool {
    requester == resource.author_id()
}

/// `Ok(())` for the owner; otherwise the redirect to send the requester to.
pub fn require_owner(
    requester: Uuid,
    resource: &impl Authored,
    fallback: impl FnOnce() -> Redirect,
) -> Result<(), Redirect> {
    if is_owner(requester, resource) {
        Ok(())
    } else {
        tracing::debug!(
            requester = %requester,
            author = %resource.author_id(),
            "Mutation refused, requester is not the author"
        );
        Err(fallback())
    }
}
