use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt::Display;

use super::{from_store, Result};
use crate::store::AuthorStore;
use crate::types::id::{marker::AuthorMarker, Id};
use crate::validation::{validate_name_present, validate_phone_number, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Author {
    pub id: Id<AuthorMarker>,
    pub name: String,
    pub phone_number: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl Author {
    #[tracing::instrument(skip(store), name = "model.authors.find")]
    pub async fn find<S>(store: &S, id: Id<AuthorMarker>) -> Result<Option<Self>>
    where
        S: AuthorStore + ?Sized,
    {
        store
            .find_author(id)
            .await
            .map_err(|e| from_store(e, None))
    }

    #[tracing::instrument(skip_all, name = "model.authors.find_by_name")]
    pub async fn find_by_name<S>(store: &S, name: &str) -> Result<Option<Self>>
    where
        S: AuthorStore + ?Sized,
    {
        store
            .find_author_by_name(name)
            .await
            .map_err(|e| from_store(e, None))
    }

    /// Lists every author ordered by their ID.
    #[tracing::instrument(skip_all, name = "model.authors.list")]
    pub async fn list<S>(store: &S) -> Result<Vec<Self>>
    where
        S: AuthorStore + ?Sized,
    {
        store.list_authors().await.map_err(|e| from_store(e, None))
    }

    /// Applies the change set to the author with the given ID.
    ///
    /// It returns `None` if there's no author with that ID. An empty
    /// change set does not touch the record, `updated_at` included.
    #[tracing::instrument(skip(store, changes), name = "model.authors.update")]
    pub async fn update<S>(
        store: &S,
        id: Id<AuthorMarker>,
        changes: &AuthorChanges,
    ) -> Result<Option<Self>>
    where
        S: AuthorStore + ?Sized,
    {
        if changes.is_empty() {
            return Self::find(store, id).await;
        }

        store
            .update_author(id, changes)
            .await
            .map_err(|e| from_store(e, Some(ValidationError::NameTaken)))
    }

    /// Returns `true` if the author existed before deleting it.
    #[tracing::instrument(skip(store), name = "model.authors.delete")]
    pub async fn delete<S>(store: &S, id: Id<AuthorMarker>) -> Result<bool>
    where
        S: AuthorStore + ?Sized,
    {
        store
            .delete_author(id)
            .await
            .map_err(|e| from_store(e, None))
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Author(id={}, name={})", self.id, self.name)
    }
}

/// An author that is not saved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    name: String,
    phone_number: Option<String>,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>) -> std::result::Result<Self, ValidationError> {
        let name = name.into();
        validate_name_present(&name)?;

        Ok(Self {
            name,
            phone_number: None,
        })
    }

    pub fn with_phone_number(
        mut self,
        phone_number: impl Into<String>,
    ) -> std::result::Result<Self, ValidationError> {
        let phone_number = phone_number.into();
        validate_phone_number(&phone_number)?;

        self.phone_number = Some(phone_number);
        Ok(self)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    /// Saves the author into the store.
    ///
    /// Name uniqueness is checked by the store while writing, so
    /// two concurrent inserts with the same name cannot both succeed.
    #[tracing::instrument(skip_all, name = "model.authors.insert")]
    pub async fn insert<S>(&self, store: &S) -> Result<Author>
    where
        S: AuthorStore + ?Sized,
    {
        store
            .insert_author(self)
            .await
            .map_err(|e| from_store(e, Some(ValidationError::NameTaken)))
    }
}

/// Field assignments to apply to an existing author.
///
/// Each setter runs the field's validator before taking the value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthorChanges {
    name: Option<String>,
    phone_number: Option<Option<String>>,
}

impl AuthorChanges {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> std::result::Result<Self, ValidationError> {
        let name = name.into();
        validate_name_present(&name)?;

        self.name = Some(name);
        Ok(self)
    }

    /// `None` removes the phone number of the author.
    pub fn with_phone_number(
        mut self,
        phone_number: Option<String>,
    ) -> std::result::Result<Self, ValidationError> {
        if let Some(phone_number) = phone_number.as_deref() {
            validate_phone_number(phone_number)?;
        }

        self.phone_number = Some(phone_number);
        Ok(self)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// `Some(None)` means the phone number will be removed.
    #[must_use]
    pub fn phone_number(&self) -> Option<Option<&str>> {
        self.phone_number.as_ref().map(Option::as_deref)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone_number.is_none()
    }

    pub(crate) fn apply(&self, author: &mut Author, now: NaiveDateTime) {
        if let Some(name) = &self.name {
            author.name.clone_from(name);
        }
        if let Some(phone_number) = &self.phone_number {
            author.phone_number.clone_from(phone_number);
        }
        author.updated_at = Some(now);
    }
}
