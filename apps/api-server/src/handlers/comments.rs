//! Comment lifecycle. Comments are addressed through their post.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_core::forms::CommentForm;

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{id}/comment
pub async fn add(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentForm>,
) -> AppResult<HttpResponse> {
    let added = state
        .blog
        .add_comment(identity.user_id, path.into_inner(), body.into_inner())
        .await?;
    Ok(views::applied(added, views::comment_record))
}

/// GET /api/posts/{id}/edit_comment/{comment_id}
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let outcome = state
        .blog
        .comment_for_edit(identity.user_id, post_id, comment_id)
        .await?;
    Ok(views::guarded(outcome, views::comment_record))
}

/// POST /api/posts/{id}/edit_comment/{comment_id}
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentForm>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let outcome = state
        .blog
        .edit_comment(identity.user_id, post_id, comment_id, body.into_inner())
        .await?;
    Ok(views::mutation(outcome, views::comment_record))
}

/// GET /api/posts/{id}/delete_comment/{comment_id}
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let outcome = state
        .blog
        .comment_for_delete(identity.user_id, post_id, comment_id)
        .await?;
    Ok(views::guarded(outcome, views::comment_record))
}

/// POST /api/posts/{id}/delete_comment/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let outcome = state
        .blog
        .delete_comment(identity.user_id, post_id, comment_id)
        .await?;
    Ok(views::mutation(outcome, views::comment_record))
}
