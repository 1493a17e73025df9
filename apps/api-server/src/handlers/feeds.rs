//! Category and profile feeds.

use actix_web::{HttpResponse, web};

use blogicum_shared::dto::{CategoryFeedResponse, ProfileResponse};

use super::posts::PageQuery;
use super::views;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/category/{slug}
pub async fn category(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let feed = state
        .blog
        .category_feed(&path, query.page.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(CategoryFeedResponse {
        category: views::category(feed.category),
        posts: views::page(feed.page, views::post),
    }))
}

/// GET /api/profile/{username}
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let feed = state
        .blog
        .profile(identity.viewer(), &path, query.page.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        user: views::public_user(feed.user),
        posts: views::page(feed.page, views::post),
    }))
}
