//! Post models

use serde::{Deserialize, Serialize};

/// A published post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub body: String,
    /// Author's user id
    pub user_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Post {
    pub fn from_new(new_post: NewPost) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: new_post.title,
            body: new_post.body,
            user_id: new_post.user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Data needed to insert a post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub user_id: String,
}

/// New-post form submission
#[derive(Debug, Default, Deserialize)]
pub struct PostForm {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Form sent by the delete button on the post page
#[derive(Debug, Default, Deserialize)]
pub struct PostActionForm {
    #[serde(rename = "_method")]
    pub method: Option<String>,
}
