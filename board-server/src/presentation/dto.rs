use crate::domain::error::DomainError;
use crate::domain::page::{PageRequest, Sort};
use crate::domain::post::Post;
use serde::{Deserialize, Serialize};

// ======================= POSTS =======================

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostResponse {
    pub post_id: i64,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadPostResponse {
    pub post_id: i64,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostResponse {
    pub post_id: i64,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePostResponse {
    pub post_id: i64,
}

impl From<Post> for CreatePostResponse {
    fn from(post: Post) -> Self {
        Self {
            post_id: post.post_id,
            title: post.title,
            content: post.content,
        }
    }
}

impl From<Post> for ReadPostResponse {
    fn from(post: Post) -> Self {
        Self {
            post_id: post.post_id,
            title: post.title,
            content: post.content,
        }
    }
}

impl From<Post> for UpdatePostResponse {
    fn from(post: Post) -> Self {
        Self {
            post_id: post.post_id,
            title: post.title,
            content: post.content,
        }
    }
}

/// `?page=0&size=5&sort=postId,desc`; every parameter is optional.
///
/// `page` and `size` are taken as raw strings: a negative page reads as 0, and a size below 1
/// or anything unparseable falls back to the default instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<String>,
    pub size: Option<String>,
    pub sort: Option<String>,
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
}

impl ListPostsQuery {
    pub fn into_page_request(self) -> Result<PageRequest, DomainError> {
        let sort = match self.sort.as_deref() {
            Some(raw) => Sort::parse(raw)?,
            None => Sort::default(),
        };

        let page = parse_number(self.page.as_deref())
            .map(|p| u32::try_from(p.max(0)).unwrap_or(u32::MAX))
            .unwrap_or(0);
        let size = match parse_number(self.size.as_deref()) {
            Some(s) if s >= 1 => u32::try_from(s).unwrap_or(PageRequest::MAX_SIZE),
            _ => PageRequest::DEFAULT_SIZE,
        };

        Ok(PageRequest::new(page, size, sort))
    }
}
