use http::StatusCode;
use shared::types::{LoginData, RegistrationData, TokenPair, User};
use tracing::info;

use super::{ApiClient, Fetched};
use crate::error::ClientError;
use crate::transport::{ApiRequest, Transport};

impl<T: Transport> ApiClient<T> {
    /// `POST /api/auth/login`, URL-encoded `{username, password}`.
    pub async fn login(&self, data: &LoginData) -> Result<Fetched<TokenPair>, ClientError> {
        info!("Logging in as {}", data.username);
        let request = ApiRequest::post("/api/auth/login")
            .anonymous()
            .form(data.to_form_body());
        self.fetch(request, StatusCode::OK).await
    }

    /// `POST /api/auth/signup`, JSON `{username, email, hash}`. Success is 201.
    pub async fn signup(&self, data: &RegistrationData) -> Result<Fetched<User>, ClientError> {
        info!("Signing up {}", data.username);
        let request = ApiRequest::post("/api/auth/signup").anonymous().json(data)?;
        self.fetch(request, StatusCode::CREATED).await
    }

    /// `GET /api/auth/logout`
    pub async fn logout(&self) -> Result<Fetched<()>, ClientError> {
        self.fetch_empty(ApiRequest::get("/api/auth/logout"), StatusCode::OK)
            .await
    }

    /// `GET /api/auth/refresh_token`, authenticated with the refresh token
    /// instead of the access token.
    pub async fn refresh_tokens(
        &self,
        refresh_token: &str,
    ) -> Result<Fetched<TokenPair>, ClientError> {
        let request = ApiRequest::get("/api/auth/refresh_token").bearer(refresh_token);
        self.fetch(request, StatusCode::OK).await
    }
}
