//! Application services composing the ports with the domain rules.

mod accounts;
mod blog;
mod catalogue;

pub use accounts::{AccountService, IssuedToken};
pub use blog::{BlogRepositories, BlogService, CategoryFeed, ProfileFeed};
pub use catalogue::CatalogueService;
