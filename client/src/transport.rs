use std::future::Future;

use bytes::Bytes;
use http::{Method, Request, StatusCode, Uri, header};
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use tracing::debug;

use crate::error::ClientError;
use crate::multipart::MultipartForm;

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// How a request authenticates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// Use the access token of the client's session.
    Session,
    /// No `Authorization` header (login, signup).
    Anonymous,
    /// An explicit bearer token, e.g. the refresh token.
    Bearer(String),
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(Bytes),
    /// Pre-encoded `application/x-www-form-urlencoded` pairs.
    Form(String),
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Content type header value and encoded body.
    pub fn encode(&self) -> (Option<String>, Bytes) {
        match self {
            Self::Empty => (None, Bytes::new()),
            Self::Json(json) => (Some("application/json".to_string()), json.clone()),
            Self::Form(form) => (
                Some("application/x-www-form-urlencoded".to_string()),
                Bytes::from(form.clone()),
            ),
            Self::Multipart(form) => (Some(form.content_type()), form.to_bytes()),
        }
    }
}

/// One API call: verb, path (including any query string) and body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    pub auth: Auth,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            auth: Auth::Session,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = RequestBody::Json(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }

    pub fn form(mut self, encoded: String) -> Self {
        self.body = RequestBody::Form(encoded);
        self
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.auth = Auth::Anonymous;
        self
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.auth = Auth::Bearer(token.into());
        self
    }

    /// The token sent in the `Authorization` header, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        match &self.auth {
            Auth::Bearer(token) => Some(token),
            _ => None,
        }
    }
}

/// Raw response: status and the fully collected body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Sends one request and returns the raw response. Exactly one attempt per
/// call: no retry, no timeout.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;
}

/// HTTP/1 transport on the hyper connection-pooling client. Speaks both
/// `http://` and `https://` (rustls with the webpki root store).
#[derive(Clone, Debug)]
pub struct HyperTransport {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    base_url: String,
}

impl HyperTransport {
    /// `base_url` is prefixed verbatim to every request path, e.g.
    /// `"http://localhost:8000"`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let connector = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())?
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);

        debug!("HTTP client ready for {}", base_url);
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_request(&self, request: &ApiRequest) -> Result<Request<Full<Bytes>>, ClientError> {
        let uri: Uri = format!("{}{}", self.base_url, request.path).parse()?;

        let mut builder = Request::builder()
            .method(request.method.clone())
            .uri(uri)
            .header(header::ACCEPT, "application/json");

        if let Some(token) = request.bearer_token() {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let (content_type, body) = request.body.encode();
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }

        Ok(builder.body(Full::new(body))?)
    }
}

impl Transport for HyperTransport {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send {
        let built = self.build_request(&request);
        let client = self.client.clone();

        async move {
            let http_request = built?;
            debug!("{} {}", request.method, request.path);

            let response = client.request(http_request).await?;
            let status = response.status();
            let body = response.into_body().collect().await?.to_bytes();

            debug!(
                "{} {} -> {} ({} bytes)",
                request.method,
                request.path,
                status.as_u16(),
                body.len()
            );

            Ok(ApiResponse { status, body })
        }
    }
}
