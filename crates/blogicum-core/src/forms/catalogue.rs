use serde::Deserialize;

use super::{max_chars, required};
use crate::domain::{Category, FIELD_MAX_LENGTH, Location};
use crate::error::FieldErrors;

/// Latin letters, digits, hyphen and underscore.
fn is_valid_slug(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub slug: String,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
}

impl CategoryForm {
    pub fn validate(self) -> Result<CategoryInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = required(&mut errors, "title", &self.title);
        max_chars(&mut errors, "title", &title, FIELD_MAX_LENGTH);
        let description = required(&mut errors, "description", &self.description);
        let slug = required(&mut errors, "slug", &self.slug);
        max_chars(&mut errors, "slug", &slug, FIELD_MAX_LENGTH);
        if !is_valid_slug(&slug) {
            errors.add(
                "slug",
                "Enter a valid slug consisting of Latin letters, numbers, underscores or hyphens.",
            );
        }

        errors.into_result(CategoryInput {
            title,
            description,
            slug,
            is_published: self.is_published.unwrap_or(true),
        })
    }
}

impl CategoryInput {
    pub fn apply_to(self, category: &mut Category) {
        category.title = self.title;
        category.description = self.description;
        category.slug = self.slug;
        category.publication.is_published = self.is_published;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationForm {
    #[serde(default)]
    pub name: String,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationInput {
    pub name: String,
    pub is_published: bool,
}

impl LocationForm {
    pub fn validate(self) -> Result<LocationInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required(&mut errors, "name", &self.name);
        max_chars(&mut errors, "name", &name, FIELD_MAX_LENGTH);
        errors.into_result(LocationInput {
            name,
            is_published: self.is_published.unwrap_or(true),
        })
    }
}

impl LocationInput {
    pub fn apply_to(self, location: &mut Location) {
        location.name = self.name;
        location.publication.is_published = self.is_published;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_slug_rules() {
        let form = |slug: &str| CategoryForm {
            title: "Travel".into(),
            description: "Trips".into(),
            slug: slug.into(),
            is_published: None,
        };

        assert!(form("travel_notes-2").validate().is_ok());
        assert!(form("путешествия").validate().is_err());
        assert!(form("with space").validate().is_err());
        assert!(form("").validate().unwrap_err().get("slug").is_some());
    }

    #[test]
    fn test_location_defaults_to_published() {
        let input = LocationForm {
            name: "Moscow".into(),
            is_published: None,
        }
        .validate()
        .unwrap();

        assert!(input.is_published);
    }
}
