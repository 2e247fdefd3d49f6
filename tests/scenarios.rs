#![allow(clippy::unwrap_used)]

use scribe::model::{ErrorExt, NewAuthor, NewPost};
use scribe::store::MemoryStore;
use scribe::{Author, Post, ValidationError};

#[tokio::test]
async fn second_author_with_same_name_fails() {
    let store = MemoryStore::new();

    let jane = NewAuthor::new("Jane Doe")
        .unwrap()
        .with_phone_number("5551234567")
        .unwrap()
        .insert(&store)
        .await
        .unwrap();
    assert_eq!("Author(id=1, name=Jane Doe)", jane.to_string());

    let error = NewAuthor::new("Jane Doe")
        .unwrap()
        .insert(&store)
        .await
        .unwrap_err();
    assert_eq!(Some(&ValidationError::NameTaken), error.validation_error());
    assert_eq!("Author name must be unique.", error.current_context().to_string());

    assert_eq!(vec![jane], Author::list(&store).await.unwrap());
}

#[tokio::test]
async fn clickbait_post_is_created() {
    let store = MemoryStore::new();

    let post = NewPost::new("Top 10 Secrets", "a".repeat(260), "Fiction")
        .unwrap()
        .with_summary("b".repeat(100))
        .unwrap()
        .insert(&store)
        .await
        .unwrap();

    assert_eq!(Some(post), Post::find(&store, scribe::types::Id::new(1)).await.unwrap());
}

#[test]
fn normal_title_is_rejected() {
    let error = NewPost::new("A Normal Day", "a".repeat(260), "Fiction").unwrap_err();
    assert_eq!(ValidationError::TitleNotClickbait, error);
    assert_eq!("title", error.field());
}
