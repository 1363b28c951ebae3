use http::StatusCode;
use shared::types::{Comment, CommentUpdate, NewComment};

use super::{ApiClient, Fetched};
use crate::error::ClientError;
use crate::transport::{ApiRequest, Transport};

impl<T: Transport> ApiClient<T> {
    /// `GET /api/comments/{photo_id}`
    pub async fn comments_for_photo(
        &self,
        photo_id: i64,
    ) -> Result<Fetched<Vec<Comment>>, ClientError> {
        self.fetch(
            ApiRequest::get(format!("/api/comments/{}", photo_id)),
            StatusCode::OK,
        )
        .await
    }

    /// `POST /api/comments/?user_id={id}` with `{text, photo_id}`.
    pub async fn post_comment(
        &self,
        user_id: i64,
        comment: &NewComment,
    ) -> Result<Fetched<Comment>, ClientError> {
        let request =
            ApiRequest::post(format!("/api/comments/?user_id={}", user_id)).json(comment)?;
        self.fetch(request, StatusCode::OK).await
    }

    /// `PUT /api/comments/{comment_id}?user_id={id}` with `{text}`. Only the
    /// author may edit; others get 403.
    pub async fn edit_comment(
        &self,
        comment_id: i64,
        user_id: i64,
        text: &str,
    ) -> Result<Fetched<Comment>, ClientError> {
        let request = ApiRequest::put(format!(
            "/api/comments/{}?user_id={}",
            comment_id, user_id
        ))
        .json(&CommentUpdate {
            text: text.to_string(),
        })?;
        self.fetch(request, StatusCode::OK).await
    }

    /// `DELETE /api/comments/{comment_id}` (admins and moderators).
    pub async fn delete_comment(&self, comment_id: i64) -> Result<Fetched<()>, ClientError> {
        self.fetch_empty(
            ApiRequest::delete(format!("/api/comments/{}", comment_id)),
            StatusCode::OK,
        )
        .await
    }
}
