//! Route-level tests over the in-memory store.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test, web};
use chrono::{TimeDelta, Utc};
use mockable::DefaultClock;
use serde_json::{Value, json};
use uuid::Uuid;

use blogicum_core::domain::{Category, Post, User};
use blogicum_core::ports::BaseRepository;
use blogicum_infra::{InMemoryStore, JwtConfig};

use super::configure_routes;
use crate::config::AppConfig;
use crate::middleware::error::{extractor_error, path_error};
use crate::state::AppState;

fn config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: None,
        posts_per_page: 10,
        jwt: JwtConfig::default(),
        staff_usernames: vec!["editor".to_string()],
        #[cfg(feature = "rate-limit")]
        rate_limit: blogicum_infra::RateLimitConfig {
            max_requests: 1_000,
            window: std::time::Duration::from_secs(60),
        },
    }
}

struct Blog {
    store: InMemoryStore,
    state: AppState,
}

impl Blog {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let state = AppState::in_memory(&config(), &store, Arc::new(DefaultClock));
        Self { store, state }
    }

    fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let state = self.state.clone();
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::JsonConfig::default().error_handler(extractor_error))
            .app_data(web::PathConfig::default().error_handler(path_error))
            .configure(move |cfg| configure_routes(cfg, &state))
    }

    async fn user(&self, username: &str, staff: bool) -> (User, String) {
        let mut user = User::new(username.to_string(), "unused".to_string(), Utc::now());
        user.is_staff = staff;
        let user = self.store.users().insert(user).await.unwrap();
        let token = self
            .state
            .tokens
            .generate_token(user.id, &user.username, user.roles())
            .unwrap();
        (user, format!("Bearer {token}"))
    }

    async fn post(&self, author: &User, title: &str) -> Post {
        let mut post = Post::new(
            author.id,
            title.to_string(),
            "text".to_string(),
            Utc::now() - TimeDelta::hours(1),
        );
        post.pub_date = Utc::now() - TimeDelta::hours(1);
        self.store.posts().insert(post).await.unwrap()
    }
}

fn location(res: &actix_web::dev::ServiceResponse) -> &str {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[actix_rt::test]
async fn test_health_check() {
    let blog = Blog::new();
    let app = actix_test::init_service(blog.app()).await;

    let req = actix_test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert!(body["request_id"].is_string());
}

#[actix_rt::test]
async fn test_register_then_me() {
    let blog = Blog::new();
    let app = actix_test::init_service(blog.app()).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "anna",
            "password": "correct horse",
            "password_confirmation": "correct horse",
        }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["username"], "anna");

    let token = body["access_token"].as_str().unwrap();
    let req = actix_test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let me: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["username"], "anna");
}

#[actix_rt::test]
async fn test_mismatched_passwords_are_unprocessable() {
    let blog = Blog::new();
    let app = actix_test::init_service(blog.app()).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "anna",
            "password": "correct horse",
            "password_confirmation": "battery staple",
        }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = actix_test::read_body_json(res).await;
    assert!(body["errors"]["password_confirmation"].is_array());
}

#[actix_rt::test]
async fn test_create_post_requires_token() {
    let blog = Blog::new();
    let app = actix_test::init_service(blog.app()).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({ "title": "t", "text": "x" }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        res.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
}

#[actix_rt::test]
async fn test_create_post_redirects_to_profile() {
    let blog = Blog::new();
    let (_, auth) = blog.user("anna", false).await;
    let app = actix_test::init_service(blog.app()).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, auth))
        .set_json(json!({ "title": "Hello", "text": "World" }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/api/profile/anna");
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["redirect_to"], "/api/profile/anna");
    assert_eq!(body["data"]["title"], "Hello");
}

#[actix_rt::test]
async fn test_blank_title_is_unprocessable() {
    let blog = Blog::new();
    let (_, auth) = blog.user("anna", false).await;
    let app = actix_test::init_service(blog.app()).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, auth))
        .set_json(json!({ "title": "  ", "text": "World" }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = actix_test::read_body_json(res).await;
    assert!(body["errors"]["title"].is_array());
}

#[actix_rt::test]
async fn test_foreign_edit_redirects_to_detail() {
    let blog = Blog::new();
    let (anna, _) = blog.user("anna", false).await;
    let (_, boris) = blog.user("boris", false).await;
    let post = blog.post(&anna, "Original").await;
    let app = actix_test::init_service(blog.app()).await;

    let req = actix_test::TestRequest::post()
        .uri(&format!("/api/posts/{}/edit", post.id))
        .insert_header((header::AUTHORIZATION, boris))
        .set_json(json!({ "title": "Hijacked", "text": "x" }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/api/posts/{}", post.id));

    let stored = blog.store.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Original");
}

#[actix_rt::test]
async fn test_owner_edit_form_is_prefilled() {
    let blog = Blog::new();
    let (anna, auth) = blog.user("anna", false).await;
    let post = blog.post(&anna, "Original").await;
    let app = actix_test::init_service(blog.app()).await;

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/posts/{}/edit", post.id))
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["title"], "Original");
    assert_eq!(body["text"], "text");
    assert_eq!(body["is_published"], true);
    assert!(body.get("id").is_none());
}

#[actix_rt::test]
async fn test_unpublished_post_is_visible_only_to_author() {
    let blog = Blog::new();
    let (anna, auth) = blog.user("anna", false).await;
    let mut post = blog.post(&anna, "Draft").await;
    post.publication.is_published = false;
    blog.store.posts().update(post.clone()).await.unwrap();
    let app = actix_test::init_service(blog.app()).await;

    let anonymous = actix_test::TestRequest::get()
        .uri(&format!("/api/posts/{}", post.id))
        .to_request();
    let res = actix_test::call_service(&app, anonymous).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let owner = actix_test::TestRequest::get()
        .uri(&format!("/api/posts/{}", post.id))
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, owner).await;
    assert_eq!(body["title"], "Draft");
    assert_eq!(body["comments"], json!([]));
}

#[actix_rt::test]
async fn test_malformed_post_id_is_not_found() {
    let blog = Blog::new();
    let app = actix_test::init_service(blog.app()).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/posts/not-a-uuid")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_comment_then_foreign_delete_is_refused() {
    let blog = Blog::new();
    let (anna, anna_auth) = blog.user("anna", false).await;
    let (_, boris_auth) = blog.user("boris", false).await;
    let post = blog.post(&anna, "Hello").await;
    let app = actix_test::init_service(blog.app()).await;

    let req = actix_test::TestRequest::post()
        .uri(&format!("/api/posts/{}/comment", post.id))
        .insert_header((header::AUTHORIZATION, anna_auth))
        .set_json(json!({ "text": "First!" }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let body: Value = actix_test::read_body_json(res).await;
    let comment_id: Uuid = body["data"]["id"].as_str().unwrap().parse().unwrap();

    let req = actix_test::TestRequest::post()
        .uri(&format!("/api/posts/{}/delete_comment/{comment_id}", post.id))
        .insert_header((header::AUTHORIZATION, boris_auth))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/api/posts/{}", post.id));

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/posts/{}", post.id))
        .to_request();
    let detail: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["comment_count"], 1);
    assert_eq!(detail["comments"][0]["text"], "First!");
}

#[actix_rt::test]
async fn test_category_feed_hides_unpublished_category() {
    let blog = Blog::new();
    let mut category = Category::new(
        "News".to_string(),
        "d".to_string(),
        "news".to_string(),
        Utc::now(),
    );
    category.publication.is_published = false;
    blog.store.categories().insert(category).await.unwrap();
    let app = actix_test::init_service(blog.app()).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/category/news")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_profile_lists_public_posts() {
    let blog = Blog::new();
    let (anna, _) = blog.user("anna", false).await;
    blog.post(&anna, "Hello").await;
    let app = actix_test::init_service(blog.app()).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/profile/anna?page=abc")
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["user"]["username"], "anna");
    assert_eq!(body["posts"]["page"], 1);
    assert_eq!(body["posts"]["items"][0]["title"], "Hello");
    assert!(body["user"].get("email").is_none());
}

#[actix_rt::test]
async fn test_admin_requires_staff() {
    let blog = Blog::new();
    let (_, user) = blog.user("anna", false).await;
    let (_, staff) = blog.user("root", true).await;
    let app = actix_test::init_service(blog.app()).await;

    let form = json!({ "title": "News", "description": "d", "slug": "news" });

    let req = actix_test::TestRequest::post()
        .uri("/api/admin/categories")
        .insert_header((header::AUTHORIZATION, user))
        .set_json(&form)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let req = actix_test::TestRequest::post()
        .uri("/api/admin/categories")
        .insert_header((header::AUTHORIZATION, staff))
        .set_json(&form)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["slug"], "news");
}

#[actix_rt::test]
async fn test_listed_account_registers_as_staff() {
    let blog = Blog::new();
    let app = actix_test::init_service(blog.app()).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "editor",
            "password": "correct horse",
            "password_confirmation": "correct horse",
        }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["is_staff"], true);
    let token = body["access_token"].as_str().unwrap();

    let req = actix_test::TestRequest::post()
        .uri("/api/admin/locations")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .set_json(json!({ "name": "Harbour" }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::CREATED);
}
