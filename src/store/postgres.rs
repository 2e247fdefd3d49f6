use async_trait::async_trait;

use super::{AuthorStore, PostStore};
use crate::database::{ErrorExt, Pool, Result};
use crate::model::{Author, AuthorChanges, NewAuthor, NewPost, Post, PostChanges};
use crate::types::id::{
    marker::{AuthorMarker, PostMarker},
    Id,
};

/// Record store backed by the Postgres tables from
/// [`MIGRATOR`](crate::database::MIGRATOR).
///
/// Name uniqueness is enforced by the `authors_name_key` constraint.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

#[async_trait]
impl AuthorStore for PgStore {
    #[tracing::instrument(skip(self), name = "db.authors.find")]
    async fn find_author(&self, id: Id<AuthorMarker>) -> Result<Option<Author>> {
        let mut conn = self.pool.get().await?;
        sqlx::query_as::<_, Author>(r#"SELECT * FROM "authors" WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.authors.find_by_name")]
    async fn find_author_by_name(&self, name: &str) -> Result<Option<Author>> {
        let mut conn = self.pool.get().await?;
        sqlx::query_as::<_, Author>(r#"SELECT * FROM "authors" WHERE name = $1"#)
            .bind(name)
            .fetch_optional(&mut *conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.authors.list")]
    async fn list_authors(&self) -> Result<Vec<Author>> {
        let mut conn = self.pool.get().await?;
        sqlx::query_as::<_, Author>(r#"SELECT * FROM "authors" ORDER BY id"#)
            .fetch_all(&mut *conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.authors.insert")]
    async fn insert_author(&self, author: &NewAuthor) -> Result<Author> {
        let mut conn = self.pool.get().await?;
        sqlx::query_as::<_, Author>(
            r#"INSERT INTO "authors" (name, phone_number)
            VALUES ($1, $2)
            RETURNING *"#,
        )
        .bind(author.name())
        .bind(author.phone_number())
        .fetch_one(&mut *conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(self, changes), name = "db.authors.update")]
    async fn update_author(
        &self,
        id: Id<AuthorMarker>,
        changes: &AuthorChanges,
    ) -> Result<Option<Author>> {
        let mut conn = self.pool.get().await?;
        let phone_number = changes.phone_number();

        sqlx::query_as::<_, Author>(
            r#"UPDATE "authors"
            SET name = COALESCE($2, name),
                phone_number = CASE WHEN $3 THEN $4 ELSE phone_number END,
                updated_at = (now() AT TIME ZONE 'utc')
            WHERE id = $1
            RETURNING *"#,
        )
        .bind(id)
        .bind(changes.name())
        .bind(phone_number.is_some())
        .bind(phone_number.flatten())
        .fetch_optional(&mut *conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(self), name = "db.authors.delete")]
    async fn delete_author(&self, id: Id<AuthorMarker>) -> Result<bool> {
        let mut conn = self.pool.get().await?;
        let result = sqlx::query(r#"DELETE FROM "authors" WHERE id = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await
            .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PostStore for PgStore {
    #[tracing::instrument(skip(self), name = "db.posts.find")]
    async fn find_post(&self, id: Id<PostMarker>) -> Result<Option<Post>> {
        let mut conn = self.pool.get().await?;
        sqlx::query_as::<_, Post>(r#"SELECT * FROM "posts" WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.posts.list")]
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let mut conn = self.pool.get().await?;
        sqlx::query_as::<_, Post>(r#"SELECT * FROM "posts" ORDER BY id"#)
            .fetch_all(&mut *conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.posts.insert")]
    async fn insert_post(&self, post: &NewPost) -> Result<Post> {
        let mut conn = self.pool.get().await?;
        sqlx::query_as::<_, Post>(
            r#"INSERT INTO "posts" (title, content, summary, category)
            VALUES ($1, $2, $3, $4)
            RETURNING *"#,
        )
        .bind(post.title())
        .bind(post.content())
        .bind(post.summary())
        .bind(post.category())
        .fetch_one(&mut *conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(self, changes), name = "db.posts.update")]
    async fn update_post(
        &self,
        id: Id<PostMarker>,
        changes: &PostChanges,
    ) -> Result<Option<Post>> {
        let mut conn = self.pool.get().await?;
        let summary = changes.summary();

        sqlx::query_as::<_, Post>(
            r#"UPDATE "posts"
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                summary = CASE WHEN $4 THEN $5 ELSE summary END,
                category = COALESCE($6, category),
                updated_at = (now() AT TIME ZONE 'utc')
            WHERE id = $1
            RETURNING *"#,
        )
        .bind(id)
        .bind(changes.title())
        .bind(changes.content())
        .bind(summary.is_some())
        .bind(summary.flatten())
        .bind(changes.category())
        .fetch_optional(&mut *conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(self), name = "db.posts.delete")]
    async fn delete_post(&self, id: Id<PostMarker>) -> Result<bool> {
        let mut conn = self.pool.get().await?;
        let result = sqlx::query(r#"DELETE FROM "posts" WHERE id = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await
            .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }
}
