//! Post feed, detail and the post lifecycle.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use blogicum_core::forms::PostForm;

use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// `?page=` of a feed. Kept raw: anything unparseable means page one.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.blog.home_feed(query.page.as_deref()).await?;
    Ok(HttpResponse::Ok().json(views::page(page, views::post)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let created = state
        .blog
        .create_post(identity.user_id, body.into_inner())
        .await?;
    Ok(views::applied(created, views::post_record))
}

/// GET /api/posts/{id}
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let detail = state
        .blog
        .post_detail(identity.viewer(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(views::post_detail(detail)))
}

/// GET /api/posts/{id}/edit
///
/// Answers with the form prefilled from the stored post.
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .post_for_edit(identity.user_id, path.into_inner())
        .await?
        .map(|post| PostForm::from_post(&post));
    Ok(views::guarded(outcome, |form| form))
}

/// POST /api/posts/{id}/edit
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .edit_post(identity.user_id, path.into_inner(), body.into_inner())
        .await?;
    Ok(views::mutation(outcome, views::post_record))
}

/// GET /api/posts/{id}/delete
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .post_for_delete(identity.user_id, path.into_inner())
        .await?;
    Ok(views::guarded(outcome, views::post))
}

/// POST /api/posts/{id}/delete
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .delete_post(identity.user_id, path.into_inner())
        .await?;
    Ok(views::mutation(outcome, views::post_record))
}
