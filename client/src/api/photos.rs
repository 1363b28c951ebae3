use http::StatusCode;
use shared::types::{
    Photo, PhotoSearch, PhotoTransfer, PhotoUpload, Rating, TransformOptions, TransformedPhoto,
};

use super::{ApiClient, Fetched};
use crate::error::ClientError;
use crate::multipart::MultipartForm;
use crate::transport::{ApiRequest, Transport};

impl<T: Transport> ApiClient<T> {
    /// `GET /api/photos/all/?limit={limit}`, photos of every user.
    pub async fn photo_list(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Fetched<Vec<Photo>>, ClientError> {
        let path = if offset > 0 {
            format!("/api/photos/all/?limit={}&offset={}", limit, offset)
        } else {
            format!("/api/photos/all/?limit={}", limit)
        };
        self.fetch(ApiRequest::get(path), StatusCode::OK).await
    }

    /// `GET /api/photos/{id}`
    pub async fn photo(&self, photo_id: i64) -> Result<Fetched<Photo>, ClientError> {
        self.fetch(ApiRequest::get(format!("/api/photos/{}", photo_id)), StatusCode::OK)
            .await
    }

    /// `PUT /api/photos/{id}/rating?like_value={n}`. The server answers 400
    /// for a self-rating and 422 for a value outside 1..=5.
    pub async fn rate_photo(&self, photo_id: i64, value: u8) -> Result<Fetched<()>, ClientError> {
        self.fetch_empty(
            ApiRequest::put(format!(
                "/api/photos/{}/rating?like_value={}",
                photo_id, value
            )),
            StatusCode::OK,
        )
        .await
    }

    /// `POST /api/photos`, multipart `{description, tags, file}`.
    pub async fn upload_photo(&self, upload: &PhotoUpload) -> Result<Fetched<Photo>, ClientError> {
        let form = MultipartForm::new()
            .text("description", upload.description.clone())
            .text("tags", upload.tags_field())
            .file(
                "file",
                &upload.file_name,
                &upload.content_type,
                upload.file.clone(),
            );
        self.fetch(ApiRequest::post("/api/photos").multipart(form), StatusCode::OK)
            .await
    }

    /// `GET /api/photos/search?...`
    pub async fn search_photos(
        &self,
        search: &PhotoSearch,
    ) -> Result<Fetched<Vec<Photo>>, ClientError> {
        let query = search.to_query();
        let path = if query.is_empty() {
            "/api/photos/search".to_string()
        } else {
            format!("/api/photos/search?{}", query)
        };
        self.fetch(ApiRequest::get(path), StatusCode::OK).await
    }

    /// `GET /api/photos/search/{user_id}?limit=..&offset=..`
    pub async fn user_photos(
        &self,
        user_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Fetched<Vec<Photo>>, ClientError> {
        self.fetch(
            ApiRequest::get(format!(
                "/api/photos/search/{}?limit={}&offset={}",
                user_id, limit, offset
            )),
            StatusCode::OK,
        )
        .await
    }

    /// `GET /api/photos/?limit=..&offset=..`, photos of the current user.
    pub async fn my_photos(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Fetched<Vec<Photo>>, ClientError> {
        self.fetch(
            ApiRequest::get(format!("/api/photos/?limit={}&offset={}", limit, offset)),
            StatusCode::OK,
        )
        .await
    }

    /// `PUT /api/photos/{id}?description=...`
    pub async fn update_description(
        &self,
        photo_id: i64,
        description: &str,
    ) -> Result<Fetched<Photo>, ClientError> {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("description", description)
            .finish();
        self.fetch(
            ApiRequest::put(format!("/api/photos/{}?{}", photo_id, query)),
            StatusCode::OK,
        )
        .await
    }

    /// `DELETE /api/photos/{id}`, answered with 204.
    pub async fn delete_photo(&self, photo_id: i64) -> Result<Fetched<()>, ClientError> {
        self.fetch_empty(
            ApiRequest::delete(format!("/api/photos/{}", photo_id)),
            StatusCode::NO_CONTENT,
        )
        .await
    }

    /// `GET /api/photos/{id}/transform?...`
    pub async fn transform_photo(
        &self,
        photo_id: i64,
        options: &TransformOptions,
    ) -> Result<Fetched<TransformedPhoto>, ClientError> {
        self.fetch(
            ApiRequest::get(format!(
                "/api/photos/{}/transform?{}",
                photo_id,
                options.to_query()
            )),
            StatusCode::OK,
        )
        .await
    }

    /// `GET /api/photos/{id}/rating`: every vote on the photo (admins and
    /// moderators).
    pub async fn photo_ratings(&self, photo_id: i64) -> Result<Fetched<Vec<Rating>>, ClientError> {
        self.fetch(
            ApiRequest::get(format!("/api/photos/{}/rating", photo_id)),
            StatusCode::OK,
        )
        .await
    }

    /// `DELETE /api/photos/rating/{like_id}`, answered with 204.
    pub async fn delete_rating(&self, like_id: i64) -> Result<Fetched<()>, ClientError> {
        self.fetch_empty(
            ApiRequest::delete(format!("/api/photos/rating/{}", like_id)),
            StatusCode::NO_CONTENT,
        )
        .await
    }

    /// `POST /api/photos/create-qr-code?photo_transfer_id={id}`. The server
    /// generates the QR image once and returns the same record afterwards.
    pub async fn create_qr_code(
        &self,
        transfer_id: i64,
    ) -> Result<Fetched<PhotoTransfer>, ClientError> {
        self.fetch(
            ApiRequest::post(format!(
                "/api/photos/create-qr-code?photo_transfer_id={}",
                transfer_id
            )),
            StatusCode::OK,
        )
        .await
    }
}
