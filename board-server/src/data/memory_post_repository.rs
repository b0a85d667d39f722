use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::data::post_repository::{PostRepository, PostTransaction};
use crate::domain::error::DomainError;
use crate::domain::page::{Direction, Page, PageRequest, Sort, SortProperty};
use crate::domain::post::{NewPost, Post};

#[derive(Debug, Clone, Default)]
struct Store {
    posts: BTreeMap<i64, Post>,
    last_id: i64,
}

/// Process-local post store. Ids start at 1 and are never reused.
#[derive(Clone, Default)]
pub struct InMemoryPostRepository {
    store: Arc<Mutex<Store>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Holds the store lock for its whole lifetime, so transactions run one at a time.
/// Writes go to a staged copy that only replaces the store on commit.
pub struct InMemoryPostTransaction {
    guard: OwnedMutexGuard<Store>,
    staged: Store,
}

fn compare(sort: &Sort, a: &Post, b: &Post) -> Ordering {
    let by_id = a.post_id.cmp(&b.post_id);
    let ordering = match sort.property {
        SortProperty::PostId => by_id,
        SortProperty::Title => a.title.cmp(&b.title).then(by_id),
        SortProperty::Content => a.content.cmp(&b.content).then(by_id),
    };
    match sort.direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    type Tx = InMemoryPostTransaction;

    async fn begin(&self) -> Result<Self::Tx, DomainError> {
        let guard = Arc::clone(&self.store).lock_owned().await;
        let staged = guard.clone();
        Ok(InMemoryPostTransaction { guard, staged })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.store.lock().await.posts.get(&id).cloned())
    }

    async fn find_all(&self, request: &PageRequest) -> Result<Page<Post>, DomainError> {
        let store = self.store.lock().await;
        let mut posts: Vec<Post> = store.posts.values().cloned().collect();
        posts.sort_by(|a, b| compare(&request.sort, a, b));

        let total = posts.len() as u64;
        let content = posts
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size as usize)
            .collect();

        Ok(Page::new(content, request, total))
    }
}

#[async_trait]
impl PostTransaction for InMemoryPostTransaction {
    async fn insert(&mut self, post: NewPost) -> Result<Post, DomainError> {
        self.staged.last_id += 1;
        let post = post.with_id(self.staged.last_id);
        self.staged.posts.insert(post.post_id, post.clone());
        Ok(post)
    }

    async fn save(&mut self, post: Post) -> Result<Post, DomainError> {
        match self.staged.posts.get_mut(&post.post_id) {
            Some(stored) => {
                *stored = post.clone();
                Ok(post)
            }
            None => Err(DomainError::PostNotFound(post.post_id)),
        }
    }

    async fn find_by_id(&mut self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.staged.posts.get(&id).cloned())
    }

    async fn delete(&mut self, post: &Post) -> Result<(), DomainError> {
        self.staged
            .posts
            .remove(&post.post_id)
            .map(|_| ())
            .ok_or(DomainError::PostNotFound(post.post_id))
    }

    async fn commit(mut self) -> Result<(), DomainError> {
        *self.guard = self.staged;
        Ok(())
    }
}
