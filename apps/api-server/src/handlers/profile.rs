//! Editing the requester's own profile.

use actix_web::{HttpResponse, web};

use blogicum_core::forms::ProfileForm;

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/edit_profile
pub async fn edit_form(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.blog.profile_for_edit(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(ProfileForm::from_user(&user)))
}

/// POST /api/edit_profile
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ProfileForm>,
) -> AppResult<HttpResponse> {
    let updated = state
        .blog
        .edit_profile(identity.user_id, body.into_inner())
        .await?;
    Ok(views::applied(updated, views::user))
}
