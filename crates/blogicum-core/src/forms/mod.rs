//! Form validation.
//!
//! Each form checks the syntactic constraints of its fields and returns either
//! a validated input or [`FieldErrors`] keyed by field name. Checks that need
//! storage (existing category, unique username) are added by the services.

mod account;
mod catalogue;
mod comment;
mod post;

pub use account::{LoginForm, ProfileForm, ProfileInput, RegistrationForm, RegistrationInput};
pub use catalogue::{CategoryForm, CategoryInput, LocationForm, LocationInput};
pub use comment::{CommentForm, CommentInput};
pub use post::{PostForm, PostInput};

use crate::error::FieldErrors;

pub(crate) const REQUIRED: &str = "This field is required.";

/// Trimmed value, recording a "required" error when blank.
pub(crate) fn required(errors: &mut FieldErrors, field: &str, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, REQUIRED);
    }
    trimmed.to_string()
}

pub(crate) fn max_chars(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    let count = value.chars().count();
    if count > max {
        errors.add(
            field,
            format!("Ensure this value has at most {max} characters (it has {count})."),
        );
    }
}

/// `None` for a missing or blank optional text field.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
