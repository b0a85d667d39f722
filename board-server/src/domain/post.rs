use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub post_id: i64,
    pub title: String,
    pub content: String,
}

impl Post {
    /// Replaces both editable fields at once; the id never changes.
    pub fn update(&mut self, title: String, content: String) {
        self.title = title;
        self.content = content;
    }
}

/// A post that has not been stored yet and therefore has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

impl NewPost {
    pub fn new(title: String, content: String) -> Self {
        Self { title, content }
    }

    pub fn with_id(self, post_id: i64) -> Post {
        Post {
            post_id,
            title: self.title,
            content: self.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_replaces_title_and_content_but_keeps_id() {
        let mut post = NewPost::new("Hello".into(), "World".into()).with_id(7);
        post.update("Hi".into(), "Earth".into());

        assert_eq!(post.post_id, 7);
        assert_eq!(post.title, "Hi");
        assert_eq!(post.content, "Earth");
    }
}
