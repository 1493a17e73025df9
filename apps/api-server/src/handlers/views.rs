//! Domain values rendered as wire types, and the 303 responses of the
//! post-redirect-get flow.

use actix_web::HttpResponse;
use actix_web::http::header;
use serde::Serialize;

use blogicum_core::domain::{
    Author, Category, Comment, CommentView, Location, Post, PostDetail, PostSummary, Publishable,
    User,
};
use blogicum_core::ownership::{Applied, Guarded, Mutation, Redirect};
use blogicum_core::pagination::Page;
use blogicum_shared::dto::{
    AuthorResponse, CategoryResponse, CommentRecord, CommentResponse, LocationResponse,
    PostDetailResponse, PostRecord, PostResponse, PublicUserResponse, UserResponse,
};
use blogicum_shared::{PageResponse, RedirectResponse};

/// API path of the view a redirect points at.
pub fn redirect_path(redirect: &Redirect) -> String {
    match redirect {
        Redirect::Profile { username } => format!("/api/profile/{username}"),
        Redirect::PostDetail { post_id } => format!("/api/posts/{post_id}"),
    }
}

fn see_other<T: Serialize>(location: String, data: Option<T>) -> HttpResponse {
    let body = match data {
        Some(data) => RedirectResponse::applied(location.clone(), data),
        None => RedirectResponse::refused(location.clone()),
    };
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .json(body)
}

/// 303 to the next view, carrying the changed resource.
pub fn applied<T, D: Serialize>(applied: Applied<T>, render: impl FnOnce(T) -> D) -> HttpResponse {
    see_other(redirect_path(&applied.next), Some(render(applied.value)))
}

/// Like [`applied`]; a refused mutation is a bare 303 to the read view.
pub fn mutation<T, D: Serialize>(
    outcome: Mutation<T>,
    render: impl FnOnce(T) -> D,
) -> HttpResponse {
    match outcome {
        Guarded::Allowed(done) => applied(done, render),
        Guarded::Redirected(redirect) => see_other::<D>(redirect_path(&redirect), None),
    }
}

/// 200 with the resource for the owner, 303 elsewhere for anyone else.
pub fn guarded<T, D: Serialize>(outcome: Guarded<T>, render: impl FnOnce(T) -> D) -> HttpResponse {
    match outcome {
        Guarded::Allowed(value) => HttpResponse::Ok().json(render(value)),
        Guarded::Redirected(redirect) => see_other::<D>(redirect_path(&redirect), None),
    }
}

pub fn page<T, U>(page: Page<T>, render: impl FnMut(T) -> U) -> PageResponse<U> {
    let page = page.map(render);
    PageResponse {
        items: page.items,
        page: page.number,
        per_page: page.per_page,
        total_items: page.total_items,
        total_pages: page.total_pages,
        has_next: page.has_next,
        has_previous: page.has_previous,
    }
}

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        is_staff: user.is_staff,
        date_joined: user.date_joined,
    }
}

pub fn public_user(user: User) -> PublicUserResponse {
    PublicUserResponse {
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        date_joined: user.date_joined,
    }
}

fn author(author: Author) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username,
    }
}

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        is_published: category.is_published(),
        created_at: category.created_at(),
        id: category.id,
        title: category.title,
        description: category.description,
        slug: category.slug,
    }
}

pub fn location(location: Location) -> LocationResponse {
    LocationResponse {
        is_published: location.is_published(),
        created_at: location.created_at(),
        id: location.id,
        name: location.name,
    }
}

pub fn post(summary: PostSummary) -> PostResponse {
    let PostSummary {
        post,
        author: writer,
        category: in_category,
        location: at,
        comment_count,
    } = summary;

    PostResponse {
        is_published: post.is_published(),
        created_at: post.created_at(),
        id: post.id,
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        author: author(writer),
        category: in_category.map(category),
        location: at.map(location),
        image: post.image,
        comment_count,
    }
}

pub fn post_record(post: Post) -> PostRecord {
    PostRecord {
        is_published: post.is_published(),
        created_at: post.created_at(),
        id: post.id,
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        author_id: post.author_id,
        category_id: post.category_id,
        location_id: post.location_id,
        image: post.image,
    }
}

pub fn post_detail(detail: PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        post: post(detail.summary),
        comments: detail.comments.into_iter().map(comment).collect(),
    }
}

pub fn comment(view: CommentView) -> CommentResponse {
    CommentResponse {
        id: view.comment.id,
        post_id: view.comment.post_id,
        author: author(view.author),
        text: view.comment.text,
        created_at: view.comment.created_at,
    }
}

pub fn comment_record(comment: Comment) -> CommentRecord {
    CommentRecord {
        id: comment.id,
        post_id: comment.post_id,
        author_id: comment.author_id,
        text: comment.text,
        created_at: comment.created_at,
    }
}
