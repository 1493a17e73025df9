//! Registration, login and the current account.

use actix_web::{HttpResponse, web};

use blogicum_core::forms::{LoginForm, RegistrationForm};
use blogicum_core::services::IssuedToken;
use blogicum_shared::dto::AuthResponse;

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn token_response(issued: IssuedToken) -> AuthResponse {
    AuthResponse {
        access_token: issued.access_token,
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
        user: views::user(issued.user),
    }
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegistrationForm>,
) -> AppResult<HttpResponse> {
    let issued = state.accounts.register(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(token_response(issued)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginForm>,
) -> AppResult<HttpResponse> {
    let issued = state.accounts.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(token_response(issued)))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.accounts.me(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(views::user(user)))
}
