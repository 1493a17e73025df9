//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod post;
mod publishable;
mod user;

pub use category::Category;
pub use comment::{Comment, CommentView};
pub use location::Location;
pub use post::{Post, PostDetail, PostSummary};
pub use publishable::{Publication, Publishable};
pub use user::{Author, User};

/// Maximum length of short text fields (titles, names, slugs, comments).
pub const FIELD_MAX_LENGTH: usize = 256;
