//! Staff management of categories and locations.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_core::forms::{CategoryForm, LocationForm};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/admin/categories
pub async fn list_categories(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    identity.require_staff()?;
    let categories = state.catalogue.list_categories().await?;
    Ok(HttpResponse::Ok().json(
        categories
            .into_iter()
            .map(views::category)
            .collect::<Vec<_>>(),
    ))
}

/// POST /api/admin/categories
pub async fn create_category(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryForm>,
) -> AppResult<HttpResponse> {
    identity.require_staff()?;
    let category = state.catalogue.create_category(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(views::category(category)))
}

/// PUT /api/admin/categories/{id}
pub async fn update_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CategoryForm>,
) -> AppResult<HttpResponse> {
    identity.require_staff()?;
    let category = state
        .catalogue
        .update_category(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(views::category(category)))
}

/// DELETE /api/admin/categories/{id}
pub async fn delete_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    identity.require_staff()?;
    state.catalogue.delete_category(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/admin/locations
pub async fn list_locations(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    identity.require_staff()?;
    let locations = state.catalogue.list_locations().await?;
    Ok(HttpResponse::Ok().json(
        locations
            .into_iter()
            .map(views::location)
            .collect::<Vec<_>>(),
    ))
}

/// POST /api/admin/locations
pub async fn create_location(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<LocationForm>,
) -> AppResult<HttpResponse> {
    identity.require_staff()?;
    let location = state.catalogue.create_location(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(views::location(location)))
}

/// PUT /api/admin/locations/{id}
pub async fn update_location(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<LocationForm>,
) -> AppResult<HttpResponse> {
    identity.require_staff()?;
    let location = state
        .catalogue
        .update_location(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(views::location(location)))
}

/// DELETE /api/admin/locations/{id}
pub async fn delete_location(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    identity.require_staff()?;
    state.catalogue.delete_location(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
