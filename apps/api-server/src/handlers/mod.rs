//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod comments;
mod feeds;
mod health;
mod posts;
mod profile;
mod views;

#[cfg(test)]
mod tests;

use actix_web::web;

#[cfg(feature = "rate-limit")]
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    let auth_routes = web::scope("/auth")
        .route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .route("/me", web::get().to(auth::me));

    // Credential endpoints are the brute-force target.
    #[cfg(feature = "rate-limit")]
    let auth_routes = auth_routes.wrap(RateLimitMiddleware::new(state.rate_limiter.clone()));
    #[cfg(not(feature = "rate-limit"))]
    let _ = state;

    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(auth_routes)
            // Posts and comments
            .service(
                web::resource("/posts")
                    .route(web::get().to(posts::list))
                    .route(web::post().to(posts::create)),
            )
            .route("/posts/{id}", web::get().to(posts::detail))
            .service(
                web::resource("/posts/{id}/edit")
                    .route(web::get().to(posts::edit_form))
                    .route(web::post().to(posts::edit)),
            )
            .service(
                web::resource("/posts/{id}/delete")
                    .route(web::get().to(posts::delete_form))
                    .route(web::post().to(posts::delete)),
            )
            .route("/posts/{id}/comment", web::post().to(comments::add))
            .service(
                web::resource("/posts/{id}/edit_comment/{comment_id}")
                    .route(web::get().to(comments::edit_form))
                    .route(web::post().to(comments::edit)),
            )
            .service(
                web::resource("/posts/{id}/delete_comment/{comment_id}")
                    .route(web::get().to(comments::delete_form))
                    .route(web::post().to(comments::delete)),
            )
            // Feeds and profiles
            .route("/category/{slug}", web::get().to(feeds::category))
            .route("/profile/{username}", web::get().to(feeds::profile))
            .service(
                web::resource("/edit_profile")
                    .route(web::get().to(profile::edit_form))
                    .route(web::post().to(profile::edit)),
            )
            // Staff
            .service(
                web::scope("/admin")
                    .service(
                        web::resource("/categories")
                            .route(web::get().to(admin::list_categories))
                            .route(web::post().to(admin::create_category)),
                    )
                    .service(
                        web::resource("/categories/{id}")
                            .route(web::put().to(admin::update_category))
                            .route(web::delete().to(admin::delete_category)),
                    )
                    .service(
                        web::resource("/locations")
                            .route(web::get().to(admin::list_locations))
                            .route(web::post().to(admin::create_location)),
                    )
                    .service(
                        web::resource("/locations/{id}")
                            .route(web::put().to(admin::update_location))
                            .route(web::delete().to(admin::delete_location)),
                    ),
            ),
    );
}
