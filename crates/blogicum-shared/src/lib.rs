//! # Blogicum Shared
//!
//! Wire types of the HTTP API, kept free of server dependencies so clients
//! can reuse them.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, PageResponse, RedirectResponse};
