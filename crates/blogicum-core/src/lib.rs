//! # Blogicum Core
//!
//! The domain layer of the Blogicum blog.
//! This crate holds the entities, the post visibility and ownership rules,
//! form validation and the blog service. It has no infrastructure dependencies;
//! storage, hashing and tokens are reached through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod forms;
pub mod ownership;
pub mod pagination;
pub mod ports;
pub mod services;
pub mod visibility;

pub use error::DomainError;
