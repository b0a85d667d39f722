use std::sync::Arc;

use crate::data::post_repository::{PostRepository, PostTransaction};
use crate::domain::page::{Page, PageRequest};
use crate::domain::{error::DomainError, post::NewPost};
use crate::presentation::dto::{
    CreatePostRequest, CreatePostResponse, DeletePostResponse, ReadPostResponse,
    UpdatePostRequest, UpdatePostResponse,
};
use tracing::instrument;

/// Every mutating call runs in its own transaction: commit on success, rollback when the
/// transaction is dropped on an early return.
pub struct PostService<R: PostRepository + 'static> {
    repo: Arc<R>,
}

// Sharing the repository handle must not require the repository itself to be `Clone`.
impl<R: PostRepository + 'static> Clone for PostService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R> PostService<R>
where
    R: PostRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, request))]
    pub async fn create_post(
        &self,
        request: CreatePostRequest,
    ) -> Result<CreatePostResponse, DomainError> {
        let mut tx = self.repo.begin().await?;
        let post = tx
            .insert(NewPost::new(request.title, request.content))
            .await?;
        tx.commit().await?;

        Ok(CreatePostResponse::from(post))
    }

    pub async fn read_post_by_id(&self, post_id: i64) -> Result<ReadPostResponse, DomainError> {
        self.repo
            .find_by_id(post_id)
            .await?
            .map(ReadPostResponse::from)
            .ok_or(DomainError::PostNotFound(post_id))
    }

    #[instrument(skip(self, request))]
    pub async fn update_post(
        &self,
        post_id: i64,
        request: UpdatePostRequest,
    ) -> Result<UpdatePostResponse, DomainError> {
        let mut tx = self.repo.begin().await?;
        let mut post = tx
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;

        post.update(request.title, request.content);
        let post = tx.save(post).await?;
        tx.commit().await?;

        Ok(UpdatePostResponse::from(post))
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, post_id: i64) -> Result<DeletePostResponse, DomainError> {
        let mut tx = self.repo.begin().await?;
        let post = tx
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;

        tx.delete(&post).await?;
        tx.commit().await?;

        Ok(DeletePostResponse {
            post_id: post.post_id,
        })
    }

    pub async fn read_all_post(
        &self,
        request: &PageRequest,
    ) -> Result<Page<ReadPostResponse>, DomainError> {
        let posts = self.repo.find_all(request).await?;
        Ok(posts.map(ReadPostResponse::from))
    }
}
