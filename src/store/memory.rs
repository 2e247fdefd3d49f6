use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use error_stack::Report;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use super::{AuthorStore, PostStore};
use crate::database::{Error, Result};
use crate::model::{Author, AuthorChanges, NewAuthor, NewPost, Post, PostChanges};
use crate::types::id::{
    marker::{AuthorMarker, Marker, PostMarker},
    Id,
};

/// Record store that keeps everything in memory.
///
/// Every operation holds the lock for its whole duration, which makes
/// the name conflict check and the write a single step.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    authors: BTreeMap<Id<AuthorMarker>, Author>,
    posts: BTreeMap<Id<PostMarker>, Post>,
    last_author_id: u64,
    last_post_id: u64,
}

impl State {
    fn name_taken(&self, name: &str, except: Option<Id<AuthorMarker>>) -> bool {
        self.authors
            .values()
            .any(|author| author.name == name && Some(author.id) != except)
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

// IDs start from 1 and are never reused, like `BIGSERIAL` columns.
fn next_id<M: Marker>(last: &mut u64) -> Id<M> {
    *last += 1;
    Id::new(*last)
}

#[async_trait]
impl AuthorStore for MemoryStore {
    #[tracing::instrument(skip(self), name = "memory.authors.find")]
    async fn find_author(&self, id: Id<AuthorMarker>) -> Result<Option<Author>> {
        let state = self.state.lock().await;
        Ok(state.authors.get(&id).cloned())
    }

    #[tracing::instrument(skip_all, name = "memory.authors.find_by_name")]
    async fn find_author_by_name(&self, name: &str) -> Result<Option<Author>> {
        let state = self.state.lock().await;
        Ok(state.authors.values().find(|a| a.name == name).cloned())
    }

    #[tracing::instrument(skip_all, name = "memory.authors.list")]
    async fn list_authors(&self) -> Result<Vec<Author>> {
        let state = self.state.lock().await;
        Ok(state.authors.values().cloned().collect())
    }

    #[tracing::instrument(skip_all, name = "memory.authors.insert")]
    async fn insert_author(&self, author: &NewAuthor) -> Result<Author> {
        let mut state = self.state.lock().await;
        if state.name_taken(author.name(), None) {
            return Err(Report::new(Error::UniqueViolation)
                .attach_printable("an author with the same name already exists"));
        }

        let id = next_id(&mut state.last_author_id);
        let author = Author {
            id,
            name: author.name().to_string(),
            phone_number: author.phone_number().map(ToString::to_string),
            created_at: now(),
            updated_at: None,
        };

        state.authors.insert(id, author.clone());
        tracing::debug!(%id, "inserted author");

        Ok(author)
    }

    #[tracing::instrument(skip(self, changes), name = "memory.authors.update")]
    async fn update_author(
        &self,
        id: Id<AuthorMarker>,
        changes: &AuthorChanges,
    ) -> Result<Option<Author>> {
        let mut state = self.state.lock().await;
        if !state.authors.contains_key(&id) {
            return Ok(None);
        }

        if let Some(name) = changes.name() {
            if state.name_taken(name, Some(id)) {
                return Err(Report::new(Error::UniqueViolation)
                    .attach_printable("an author with the same name already exists"));
            }
        }

        let Some(author) = state.authors.get_mut(&id) else {
            return Ok(None);
        };

        changes.apply(author, now());
        Ok(Some(author.clone()))
    }

    #[tracing::instrument(skip(self), name = "memory.authors.delete")]
    async fn delete_author(&self, id: Id<AuthorMarker>) -> Result<bool> {
        let mut state = self.state.lock().await;
        Ok(state.authors.remove(&id).is_some())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    #[tracing::instrument(skip(self), name = "memory.posts.find")]
    async fn find_post(&self, id: Id<PostMarker>) -> Result<Option<Post>> {
        let state = self.state.lock().await;
        Ok(state.posts.get(&id).cloned())
    }

    #[tracing::instrument(skip_all, name = "memory.posts.list")]
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let state = self.state.lock().await;
        Ok(state.posts.values().cloned().collect())
    }

    #[tracing::instrument(skip_all, name = "memory.posts.insert")]
    async fn insert_post(&self, post: &NewPost) -> Result<Post> {
        let mut state = self.state.lock().await;

        let id = next_id(&mut state.last_post_id);
        let post = Post {
            id,
            title: post.title().to_string(),
            content: post.content().to_string(),
            summary: post.summary().map(ToString::to_string),
            category: post.category(),
            created_at: now(),
            updated_at: None,
        };

        state.posts.insert(id, post.clone());
        tracing::debug!(%id, "inserted post");

        Ok(post)
    }

    #[tracing::instrument(skip(self, changes), name = "memory.posts.update")]
    async fn update_post(
        &self,
        id: Id<PostMarker>,
        changes: &PostChanges,
    ) -> Result<Option<Post>> {
        let mut state = self.state.lock().await;
        let Some(post) = state.posts.get_mut(&id) else {
            return Ok(None);
        };

        changes.apply(post, now());
        Ok(Some(post.clone()))
    }

    #[tracing::instrument(skip(self), name = "memory.posts.delete")]
    async fn delete_post(&self, id: Id<PostMarker>) -> Result<bool> {
        let mut state = self.state.lock().await;
        Ok(state.posts.remove(&id).is_some())
    }
}
