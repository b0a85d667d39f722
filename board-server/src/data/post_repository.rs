use crate::domain::error::DomainError;
use crate::domain::page::{Page, PageRequest};
use crate::domain::post::{NewPost, Post};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, error};

#[async_trait]
pub trait PostRepository: Send + Sync {
    type Tx: PostTransaction;

    /// Opens a unit of work. Dropping it without `commit` rolls every change back.
    async fn begin(&self) -> Result<Self::Tx, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn find_all(&self, request: &PageRequest) -> Result<Page<Post>, DomainError>;
}

#[async_trait]
pub trait PostTransaction: Send {
    /// Stores a new post and returns it with its assigned id.
    async fn insert(&mut self, post: NewPost) -> Result<Post, DomainError>;
    /// Writes the current title and content of an existing post.
    async fn save(&mut self, post: Post) -> Result<Post, DomainError>;
    async fn find_by_id(&mut self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn delete(&mut self, post: &Post) -> Result<(), DomainError>;
    async fn commit(self) -> Result<(), DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub struct PostgresPostTransaction {
    tx: Transaction<'static, Postgres>,
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("db error while {}: {}", context, e);
    DomainError::Internal(e.to_string())
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    type Tx = PostgresPostTransaction;

    async fn begin(&self) -> Result<Self::Tx, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("opening transaction", e))?;
        Ok(PostgresPostTransaction { tx })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT post_id, title, content
            FROM posts WHERE post_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding post", e))
    }

    async fn find_all(&self, request: &PageRequest) -> Result<Page<Post>, DomainError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting posts", e))?;

        // order_by only ever renders whitelisted column names
        let sql = format!(
            "SELECT post_id, title, content FROM posts ORDER BY {} LIMIT $1 OFFSET $2",
            request.sort.order_by()
        );
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(i64::from(request.size))
            .bind(request.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("fetching posts", e))?;

        Ok(Page::new(posts, request, total.max(0) as u64))
    }
}

#[async_trait]
impl PostTransaction for PostgresPostTransaction {
    async fn insert(&mut self, post: NewPost) -> Result<Post, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, content)
            VALUES ($1, $2)
            RETURNING post_id, title, content
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| db_error("creating post", e))?;

        debug!(post_id = post.post_id, "post inserted");
        Ok(post)
    }

    async fn save(&mut self, post: Post) -> Result<Post, DomainError> {
        let saved = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = $1, content = $2
            WHERE post_id = $3
            RETURNING post_id, title, content
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.post_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| db_error("updating post", e))?;

        saved.ok_or(DomainError::PostNotFound(post.post_id))
    }

    async fn find_by_id(&mut self, id: i64) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT post_id, title, content
            FROM posts WHERE post_id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| db_error("locking post", e))
    }

    async fn delete(&mut self, post: &Post) -> Result<(), DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE post_id = $1")
            .bind(post.post_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| db_error("deleting post", e))?;

        if deleted.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(post.post_id));
        }
        Ok(())
    }

    async fn commit(self) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| db_error("committing transaction", e))
    }
}
