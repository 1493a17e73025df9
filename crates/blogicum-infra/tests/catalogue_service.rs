//! Staff management of categories and locations.

mod support;

use blogicum_core::DomainError;
use blogicum_core::forms::{CategoryForm, LocationForm};
use blogicum_core::ports::BaseRepository;

use support::{World, hours, missing};

fn category_form(title: &str, slug: &str) -> CategoryForm {
    CategoryForm {
        title: title.into(),
        description: "About".into(),
        slug: slug.into(),
        is_published: None,
    }
}

#[tokio::test]
async fn categories_are_listed_by_title_descending() {
    let world = World::new();
    for (title, slug) in [("Books", "books"), ("Travel", "travel"), ("Music", "music")] {
        world.catalogue.create_category(category_form(title, slug)).await.unwrap();
    }

    let titles: Vec<String> = world
        .catalogue
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.title)
        .collect();

    assert_eq!(titles, vec!["Travel", "Music", "Books"]);
}

#[tokio::test]
async fn duplicate_slug_is_a_field_error() {
    let world = World::new();
    world.catalogue.create_category(category_form("News", "news")).await.unwrap();

    let result = world.catalogue.create_category(category_form("More news", "news")).await;

    match result {
        Err(DomainError::Validation(errors)) => assert!(errors.get("slug").is_some()),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn update_may_keep_its_own_slug() {
    let world = World::new();
    let news = world.catalogue.create_category(category_form("News", "news")).await.unwrap();

    let mut form = category_form("Old news", "news");
    form.is_published = Some(false);
    let updated = world.catalogue.update_category(news.id, form).await.unwrap();

    assert_eq!(updated.title, "Old news");
    assert!(!updated.publication.is_published);
}

#[tokio::test]
async fn deleting_category_keeps_its_posts() {
    let world = World::new();
    let anna = world.user("anna").await;
    let news = world.category("news", true).await;
    let mut post = world.post(&anna, "headline", -hours(1)).await;
    post.category_id = Some(news.id);
    let post = world.save_post(post).await;

    world.catalogue.delete_category(news.id).await.unwrap();

    let kept = world.store.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(kept.category_id, None);
}

#[tokio::test]
async fn deleting_unknown_rows_is_not_found() {
    let world = World::new();

    assert!(matches!(
        world.catalogue.delete_category(missing()).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        world.catalogue.delete_location(missing()).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn locations_round_through_the_service() {
    let world = World::new();
    let spb = world
        .catalogue
        .create_location(LocationForm {
            name: "Saint Petersburg".into(),
            is_published: None,
        })
        .await
        .unwrap();
    world.location("Moscow").await;

    let renamed = world
        .catalogue
        .update_location(
            spb.id,
            LocationForm {
                name: "Petersburg".into(),
                is_published: Some(true),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Petersburg");

    let names: Vec<String> = world
        .catalogue
        .list_locations()
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.name)
        .collect();
    assert_eq!(names, vec!["Petersburg", "Moscow"]);
}

#[tokio::test]
async fn blank_location_name_is_rejected() {
    let world = World::new();

    let result = world
        .catalogue
        .create_location(LocationForm::default())
        .await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
}
