use crate::error::BoardClientError;
use crate::{DeletedPost, Post, PostPage};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

#[derive(Clone)]
pub struct BoardClient {
    client: Client,
    base_url: String,
}

/// Query for `GET /api/v1/posts`. Unset fields use the server defaults
/// (page 0, size 5, newest first).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListPosts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

#[derive(Serialize)]
struct PostBody<'a> {
    title: &'a str,
    content: &'a str,
}

impl BoardClient {
    pub fn new(endpoint: &str) -> Result<Self, BoardClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
        })
    }

    fn posts_url(&self) -> String {
        format!("{}/api/v1/posts", self.base_url)
    }

    fn post_url(&self, id: i64) -> String {
        format!("{}/{}", self.posts_url(), id)
    }

    pub async fn create_post(&self, title: &str, content: &str) -> Result<Post, BoardClientError> {
        let resp = self
            .client
            .post(self.posts_url())
            .json(&PostBody { title, content })
            .send()
            .await?;
        parse(resp).await
    }

    pub async fn read_post(&self, id: i64) -> Result<Post, BoardClientError> {
        let resp = self.client.get(self.post_url(id)).send().await?;
        parse(resp).await
    }

    pub async fn update_post(
        &self,
        id: i64,
        title: &str,
        content: &str,
    ) -> Result<Post, BoardClientError> {
        let resp = self
            .client
            .put(self.post_url(id))
            .json(&PostBody { title, content })
            .send()
            .await?;
        parse(resp).await
    }

    pub async fn delete_post(&self, id: i64) -> Result<DeletedPost, BoardClientError> {
        let resp = self.client.delete(self.post_url(id)).send().await?;
        parse(resp).await
    }

    pub async fn list_posts(&self, query: &ListPosts) -> Result<PostPage, BoardClientError> {
        let resp = self
            .client
            .get(self.posts_url())
            .query(query)
            .send()
            .await?;
        parse(resp).await
    }
}

async fn parse<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, BoardClientError> {
    let status = resp.status();
    debug!(%status, url = %resp.url(), "board api response");

    if status.is_success() {
        Ok(resp.json().await?)
    } else {
        Err(BoardClientError::from_http_response(resp).await)
    }
}
