use serde::{Deserialize, Serialize};

/// A comment as returned by `/api/comments/{photo_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub photo_id: i64,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of `POST /api/comments/?user_id={id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub text: String,
    pub photo_id: i64,
}

/// Body of `PUT /api/comments/{comment_id}?user_id={id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentUpdate {
    pub text: String,
}
