//! Staff management of categories and locations.
//!
//! Deleting either never touches posts beyond clearing their reference.

use std::sync::Arc;

use mockable::Clock;
use uuid::Uuid;

use crate::domain::{Category, Location};
use crate::error::{DomainError, FieldErrors};
use crate::forms::{CategoryForm, LocationForm};
use crate::ports::{CategoryRepository, LocationRepository};

#[derive(Clone)]
pub struct CatalogueService {
    categories: Arc<dyn CategoryRepository>,
    locations: Arc<dyn LocationRepository>,
    clock: Arc<dyn Clock>,
}

impl CatalogueService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        locations: Arc<dyn LocationRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            categories,
            locations,
            clock,
        }
    }

    async fn ensure_slug_free(&self, slug: &str, except: Option<Uuid>) -> Result<(), DomainError> {
        let existing = self.categories.find_by_slug(slug).await?;
        if existing.is_some_and(|category| Some(category.id) != except) {
            let mut errors = FieldErrors::new();
            errors.add("slug", "Category with this slug already exists.");
            return Err(errors.into());
        }
        Ok(())
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.list().await?)
    }

    pub async fn create_category(&self, form: CategoryForm) -> Result<Category, DomainError> {
        let input = form.validate()?;
        self.ensure_slug_free(&input.slug, None).await?;

        let mut category = Category::new(
            input.title,
            input.description,
            input.slug,
            self.clock.utc(),
        );
        category.publication.is_published = input.is_published;

        let category = self.categories.insert(category).await?;
        tracing::info!(slug = %category.slug, "Category created");
        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        form: CategoryForm,
    ) -> Result<Category, DomainError> {
        let mut category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("category", id))?;
        let input = form.validate()?;
        self.ensure_slug_free(&input.slug, Some(id)).await?;

        input.apply_to(&mut category);
        Ok(self.categories.update(category).await?)
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<(), DomainError> {
        if self.categories.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("category", id));
        }
        self.categories.delete(id).await?;
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }

    pub async fn list_locations(&self) -> Result<Vec<Location>, DomainError> {
        Ok(self.locations.list().await?)
    }

    pub async fn create_location(&self, form: LocationForm) -> Result<Location, DomainError> {
        let input = form.validate()?;
        let mut location = Location::new(input.name, self.clock.utc());
        location.publication.is_published = input.is_published;
        Ok(self.locations.insert(location).await?)
    }

    pub async fn update_location(
        &self,
        id: Uuid,
        form: LocationForm,
    ) -> Result<Location, DomainError> {
        let mut location = self
            .locations
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("location", id))?;
        form.validate()?.apply_to(&mut location);
        Ok(self.locations.update(location).await?)
    }

    pub async fn delete_location(&self, id: Uuid) -> Result<(), DomainError> {
        if self.locations.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("location", id));
        }
        self.locations.delete(id).await?;
        tracing::info!(location_id = %id, "Location deleted");
        Ok(())
    }
}
