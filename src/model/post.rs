use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt::Display;
use std::str::FromStr;

use super::{from_store, Result};
use crate::store::PostStore;
use crate::types::id::{marker::PostMarker, Id};
use crate::validation::{
    validate_category, validate_content, validate_summary, validate_title, ValidationError,
};

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub category: Category,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl Post {
    #[tracing::instrument(skip(store), name = "model.posts.find")]
    pub async fn find<S>(store: &S, id: Id<PostMarker>) -> Result<Option<Self>>
    where
        S: PostStore + ?Sized,
    {
        store.find_post(id).await.map_err(|e| from_store(e, None))
    }

    /// Lists every post ordered by their ID.
    #[tracing::instrument(skip_all, name = "model.posts.list")]
    pub async fn list<S>(store: &S) -> Result<Vec<Self>>
    where
        S: PostStore + ?Sized,
    {
        store.list_posts().await.map_err(|e| from_store(e, None))
    }

    /// Applies the change set to the post with the given ID.
    ///
    /// It returns `None` if there's no post with that ID.
    #[tracing::instrument(skip(store, changes), name = "model.posts.update")]
    pub async fn update<S>(
        store: &S,
        id: Id<PostMarker>,
        changes: &PostChanges,
    ) -> Result<Option<Self>>
    where
        S: PostStore + ?Sized,
    {
        if changes.is_empty() {
            return Self::find(store, id).await;
        }

        store
            .update_post(id, changes)
            .await
            .map_err(|e| from_store(e, None))
    }

    #[tracing::instrument(skip(store), name = "model.posts.delete")]
    pub async fn delete<S>(store: &S, id: Id<PostMarker>) -> Result<bool>
    where
        S: PostStore + ?Sized,
    {
        store.delete_post(id).await.map_err(|e| from_store(e, None))
    }
}

impl Display for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Post(id={}, title={}, content={}, summary={})",
            self.id,
            self.title,
            self.content,
            self.summary.as_deref().unwrap_or("None")
        )
    }
}

/// Category of a post, stored as `Fiction` or `Non-Fiction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Fiction,
    #[serde(rename = "Non-Fiction")]
    NonFiction,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fiction => "Fiction",
            Self::NonFiction => "Non-Fiction",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match validate_category(s)? {
            "Fiction" => Ok(Self::Fiction),
            "Non-Fiction" => Ok(Self::NonFiction),
            _ => Err(ValidationError::InvalidCategory),
        }
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for Category {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::database::HasArguments<'q>>::ArgumentBuffer,
    ) -> sqlx::encode::IsNull {
        <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Category {
    fn decode(
        value: <sqlx::Postgres as sqlx::database::HasValueRef<'r>>::ValueRef,
    ) -> std::result::Result<Self, sqlx::error::BoxDynError> {
        let value = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(value.parse()?)
    }
}

impl sqlx::Type<sqlx::Postgres> for Category {
    fn type_info() -> <sqlx::Postgres as sqlx::Database>::TypeInfo {
        <str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &<sqlx::Postgres as sqlx::Database>::TypeInfo) -> bool {
        <str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

/// A post that is not saved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    title: String,
    content: String,
    summary: Option<String>,
    category: Category,
}

impl NewPost {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: &str,
    ) -> std::result::Result<Self, ValidationError> {
        let title = title.into();
        validate_title(&title)?;

        let content = content.into();
        validate_content(&content)?;

        Ok(Self {
            title,
            content,
            summary: None,
            category: category.parse()?,
        })
    }

    pub fn with_summary(
        mut self,
        summary: impl Into<String>,
    ) -> std::result::Result<Self, ValidationError> {
        let summary = summary.into();
        validate_summary(&summary)?;

        self.summary = Some(summary);
        Ok(self)
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[tracing::instrument(skip_all, name = "model.posts.insert")]
    pub async fn insert<S>(&self, store: &S) -> Result<Post>
    where
        S: PostStore + ?Sized,
    {
        store.insert_post(self).await.map_err(|e| from_store(e, None))
    }
}

/// Field assignments to apply to an existing post.
///
/// Each setter runs the field's validator before taking the value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PostChanges {
    title: Option<String>,
    content: Option<String>,
    summary: Option<Option<String>>,
    category: Option<Category>,
}

impl PostChanges {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> std::result::Result<Self, ValidationError> {
        let title = title.into();
        validate_title(&title)?;

        self.title = Some(title);
        Ok(self)
    }

    pub fn with_content(
        mut self,
        content: impl Into<String>,
    ) -> std::result::Result<Self, ValidationError> {
        let content = content.into();
        validate_content(&content)?;

        self.content = Some(content);
        Ok(self)
    }

    /// `None` removes the summary of the post.
    pub fn with_summary(
        mut self,
        summary: Option<String>,
    ) -> std::result::Result<Self, ValidationError> {
        if let Some(summary) = summary.as_deref() {
            validate_summary(summary)?;
        }

        self.summary = Some(summary);
        Ok(self)
    }

    pub fn with_category(mut self, category: &str) -> std::result::Result<Self, ValidationError> {
        self.category = Some(category.parse()?);
        Ok(self)
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// `Some(None)` means the summary will be removed.
    #[must_use]
    pub fn summary(&self) -> Option<Option<&str>> {
        self.summary.as_ref().map(Option::as_deref)
    }

    #[must_use]
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.summary.is_none()
            && self.category.is_none()
    }

    pub(crate) fn apply(&self, post: &mut Post, now: NaiveDateTime) {
        if let Some(title) = &self.title {
            post.title.clone_from(title);
        }
        if let Some(content) = &self.content {
            post.content.clone_from(content);
        }
        if let Some(summary) = &self.summary {
            post.summary.clone_from(summary);
        }
        if let Some(category) = self.category {
            post.category = category;
        }
        post.updated_at = Some(now);
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn content() -> String {
        "x".repeat(260)
    }

    async fn top_secrets(store: &MemoryStore) -> Post {
        NewPost::new("Top 10 Secrets", content(), "Fiction")
            .unwrap()
            .with_summary("s".repeat(100))
            .unwrap()
            .insert(store)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_valid_post() {
        let store = MemoryStore::new();
        let post = top_secrets(&store).await;

        assert_eq!("Top 10 Secrets", post.title);
        assert_eq!(Category::Fiction, post.category);
        assert_eq!(260, post.content.len());
        assert_eq!(Some(100), post.summary.as_deref().map(str::len));
        assert!(post.updated_at.is_none());
        assert_eq!(Some(post), Post::find(&store, Id::new(1)).await.unwrap());
    }

    #[test]
    fn test_title_without_clickbait() {
        let result = NewPost::new("A Normal Day", content(), "Fiction");
        assert_eq!(Err(ValidationError::TitleNotClickbait), result);
    }

    #[test]
    fn test_new_post_validates_fields() {
        assert_eq!(
            Err(ValidationError::ContentTooShort),
            NewPost::new("Top 10 Secrets", "too short", "Fiction")
        );
        assert_eq!(
            Err(ValidationError::InvalidCategory),
            NewPost::new("Top 10 Secrets", content(), "Poetry")
        );

        let post = NewPost::new("Guess What", content(), "Non-Fiction").unwrap();
        assert_eq!(Category::NonFiction, post.category());
        assert_eq!(None, post.summary());
        assert_eq!(
            Err(ValidationError::SummaryTooLong),
            post.with_summary("s".repeat(251))
        );
    }

    #[tokio::test]
    async fn test_update() {
        let store = MemoryStore::new();
        let post = top_secrets(&store).await;

        let changes = PostChanges::new()
            .with_title("The Secret Ending")
            .unwrap()
            .with_category("Non-Fiction")
            .unwrap()
            .with_summary(None)
            .unwrap();

        let updated = Post::update(&store, post.id, &changes)
            .await
            .unwrap()
            .unwrap();

        assert_eq!("The Secret Ending", updated.title);
        assert_eq!(Category::NonFiction, updated.category);
        assert_eq!(None, updated.summary);
        assert_eq!(post.content, updated.content);
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn test_changes_validate_fields() {
        assert_eq!(
            Err(ValidationError::TitleNotClickbait),
            PostChanges::new().with_title("A Normal Day")
        );
        assert_eq!(
            Err(ValidationError::ContentTooShort),
            PostChanges::new().with_content("")
        );
        assert_eq!(
            Err(ValidationError::SummaryTooLong),
            PostChanges::new().with_summary(Some("s".repeat(300)))
        );
        assert_eq!(
            Err(ValidationError::InvalidCategory),
            PostChanges::new().with_category("fiction")
        );
        assert!(PostChanges::new().is_empty());
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let store = MemoryStore::new();
        let first = top_secrets(&store).await;
        let second = top_secrets(&store).await;

        let ids = Post::list(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|post| post.id)
            .collect::<Vec<_>>();
        assert_eq!(vec![first.id, second.id], ids);

        assert!(Post::delete(&store, first.id).await.unwrap());
        assert_eq!(1, Post::list(&store).await.unwrap().len());
    }

    #[test]
    fn test_category() {
        assert_eq!(Ok(Category::Fiction), "Fiction".parse());
        assert_eq!(Ok(Category::NonFiction), "Non-Fiction".parse());
        assert_eq!(Err(ValidationError::InvalidCategory), "NonFiction".parse::<Category>());

        assert_eq!("\"Non-Fiction\"", serde_json::to_string(&Category::NonFiction).unwrap());
        assert_eq!("Fiction", Category::Fiction.to_string());
    }

    #[tokio::test]
    async fn test_display() {
        let store = MemoryStore::new();
        let post = NewPost::new("Top Picks", content(), "Fiction")
            .unwrap()
            .insert(&store)
            .await
            .unwrap();

        assert_eq!(
            format!("Post(id=1, title=Top Picks, content={}, summary=None)", content()),
            post.to_string()
        );
    }
}
