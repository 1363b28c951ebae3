use http::StatusCode;
use shared::types::Tag;

use super::{ApiClient, Fetched, encode_segment};
use crate::error::ClientError;
use crate::transport::{ApiRequest, Transport};

impl<T: Transport> ApiClient<T> {
    /// `GET /tags/?photo_id={id}`
    pub async fn photo_tags(&self, photo_id: i64) -> Result<Fetched<Vec<Tag>>, ClientError> {
        self.fetch(
            ApiRequest::get(format!("/tags/?photo_id={}", photo_id)),
            StatusCode::OK,
        )
        .await
    }

    /// `GET /tag/tags`: every tag known to the server.
    pub async fn all_tags(&self) -> Result<Fetched<Vec<Tag>>, ClientError> {
        self.fetch(ApiRequest::get("/tag/tags"), StatusCode::OK)
            .await
    }

    /// `POST /tag/tags?tag_name=..`. Returns the existing tag when the name
    /// is already taken.
    pub async fn create_tag(&self, name: &str) -> Result<Fetched<Tag>, ClientError> {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("tag_name", name)
            .finish();
        self.fetch(
            ApiRequest::post(format!("/tag/tags?{}", query)),
            StatusCode::OK,
        )
        .await
    }

    /// `DELETE /tag/tags/{name}`, answered with 204.
    pub async fn delete_tag(&self, name: &str) -> Result<Fetched<()>, ClientError> {
        self.fetch_empty(
            ApiRequest::delete(format!("/tag/tags/{}", encode_segment(name))),
            StatusCode::NO_CONTENT,
        )
        .await
    }
}
