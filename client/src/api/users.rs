use http::StatusCode;
use shared::types::{AvatarUpload, User};

use super::{ApiClient, Fetched, encode_segment};
use crate::error::ClientError;
use crate::multipart::MultipartForm;
use crate::transport::{ApiRequest, Transport};

impl<T: Transport> ApiClient<T> {
    /// `GET /api/users/{id}`
    pub async fn user_by_id(&self, user_id: i64) -> Result<Fetched<User>, ClientError> {
        self.fetch(ApiRequest::get(format!("/api/users/{}", user_id)), StatusCode::OK)
            .await
    }

    /// `GET /api/users/{username}`
    pub async fn user_by_username(&self, username: &str) -> Result<Fetched<User>, ClientError> {
        self.fetch(
            ApiRequest::get(format!("/api/users/{}", encode_segment(username))),
            StatusCode::OK,
        )
        .await
    }

    /// `GET /api/users/me`
    pub async fn current_user(&self) -> Result<Fetched<User>, ClientError> {
        self.fetch(ApiRequest::get("/api/users/me"), StatusCode::OK)
            .await
    }

    /// `PATCH /api/users/me/avatar`, multipart `{file}`. Returns the updated
    /// profile.
    pub async fn update_avatar(&self, avatar: &AvatarUpload) -> Result<Fetched<User>, ClientError> {
        let form = MultipartForm::new().file(
            "file",
            &avatar.file_name,
            &avatar.content_type,
            avatar.file.clone(),
        );
        self.fetch(
            ApiRequest::patch("/api/users/me/avatar").multipart(form),
            StatusCode::OK,
        )
        .await
    }
}
