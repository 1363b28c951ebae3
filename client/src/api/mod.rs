//! Authenticated request capability and the per-resource accessors.
//!
//! Every accessor goes through [`ApiClient::fetch`], which owns the one
//! redirect-on-401 policy: an authenticated request answered with 401 sends
//! the user to the login page and yields [`Fetched::Unauthorized`].

pub mod auth;
pub mod comments;
pub mod photos;
pub mod tags;
pub mod users;

use std::sync::Arc;

use http::StatusCode;
use serde::de::DeserializeOwned;
use shared::types::ErrorResponse;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::navigation::{Location, Navigator};
use crate::session::Session;
use crate::transport::{ApiRequest, ApiResponse, Auth, Transport};

/// Outcome of one API call that reached the server.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Ok(T),
    /// The session was rejected; the user has already been sent to login.
    Unauthorized,
    /// Any other status. `message` is the body's `detail`/`message` text.
    Failure {
        status: StatusCode,
        message: Option<String>,
    },
}

impl<T> Fetched<T> {
    /// The data, or `None` for every non-success outcome.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Fetched<U> {
        match self {
            Self::Ok(value) => Fetched::Ok(f(value)),
            Self::Unauthorized => Fetched::Unauthorized,
            Self::Failure { status, message } => Fetched::Failure { status, message },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// API client bound to one page load: a transport, the session read at page
/// load (if any), and the navigator used for the 401 redirect.
pub struct ApiClient<T: Transport> {
    transport: T,
    session: Option<Session>,
    navigator: Arc<dyn Navigator>,
    login_page: String,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, navigator: Arc<dyn Navigator>, login_page: &str) -> Self {
        Self {
            transport,
            session: None,
            navigator,
            login_page: login_page.to_string(),
        }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Send `request` and classify the response. `expected` is the success
    /// status of this endpoint.
    pub async fn execute(
        &self,
        mut request: ApiRequest,
        expected: StatusCode,
    ) -> Result<Fetched<ApiResponse>, ClientError> {
        if request.auth == Auth::Session {
            request.auth = match &self.session {
                Some(session) => Auth::Bearer(session.access_token().to_string()),
                None => Auth::Anonymous,
            };
        }
        let authenticated = request.bearer_token().is_some();
        let method = request.method.clone();
        let path = request.path.clone();

        let response = self.transport.send(request).await?;

        if response.status == expected {
            debug!("{} {} ok", method, path);
            return Ok(Fetched::Ok(response));
        }

        if response.status == StatusCode::UNAUTHORIZED && authenticated {
            warn!("{} {} rejected the session, redirecting to login", method, path);
            self.navigator.navigate(Location::new(&self.login_page));
            return Ok(Fetched::Unauthorized);
        }

        let message = ErrorResponse::from_body(&response.body).and_then(|e| e.user_message());
        debug!(
            "{} {} failed with {}: {:?}",
            method,
            path,
            response.status.as_u16(),
            message
        );
        Ok(Fetched::Failure {
            status: response.status,
            message,
        })
    }

    /// [`execute`](Self::execute) and decode the JSON body into `R`.
    pub async fn fetch<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
        expected: StatusCode,
    ) -> Result<Fetched<R>, ClientError> {
        match self.execute(request, expected).await? {
            Fetched::Ok(response) => Ok(Fetched::Ok(serde_json::from_slice(&response.body)?)),
            Fetched::Unauthorized => Ok(Fetched::Unauthorized),
            Fetched::Failure { status, message } => Ok(Fetched::Failure { status, message }),
        }
    }

    /// [`execute`](Self::execute) for endpoints whose body is not needed.
    pub async fn fetch_empty(
        &self,
        request: ApiRequest,
        expected: StatusCode,
    ) -> Result<Fetched<()>, ClientError> {
        Ok(self.execute(request, expected).await?.map(|_| ()))
    }
}

/// Percent-encode one path segment.
pub(crate) fn encode_segment(segment: &str) -> String {
    // byte_serialize turns spaces into '+', which is literal in a path;
    // a real '+' in the input is already escaped as %2B.
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::RecordingNavigator;
    use crate::testing::MockTransport;
    use http::Method;
    use serde_json::json;

    fn client(mock: &MockTransport, nav: &Arc<RecordingNavigator>) -> ApiClient<MockTransport> {
        ApiClient::new(mock.clone(), nav.clone(), "/templates/login.html")
            .with_session(Session::new("tok"))
    }

    #[tokio::test]
    async fn session_token_is_sent_as_bearer() {
        let mock = MockTransport::new();
        mock.respond(Method::GET, "/api/users/me", 200, json!({"id": 1}));
        let nav = Arc::new(RecordingNavigator::new());

        client(&mock, &nav)
            .fetch::<serde_json::Value>(ApiRequest::get("/api/users/me"), StatusCode::OK)
            .await
            .unwrap();

        assert_eq!(mock.requests()[0].bearer.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn unauthorized_redirects_once_and_returns_no_data() {
        let mock = MockTransport::new();
        mock.respond(Method::GET, "/api/photos/3", 401, json!({"detail": "Not authenticated"}));
        let nav = Arc::new(RecordingNavigator::new());

        let result = client(&mock, &nav)
            .fetch::<serde_json::Value>(ApiRequest::get("/api/photos/3"), StatusCode::OK)
            .await
            .unwrap();

        assert!(result.is_unauthorized());
        assert_eq!(nav.history().len(), 1);
        assert_eq!(nav.last().unwrap().path, "/templates/login.html");
    }

    #[tokio::test]
    async fn anonymous_401_is_a_plain_failure() {
        let mock = MockTransport::new();
        mock.respond(Method::POST, "/api/auth/login", 401, json!({"detail": "Invalid password"}));
        let nav = Arc::new(RecordingNavigator::new());

        let result = client(&mock, &nav)
            .fetch::<serde_json::Value>(
                ApiRequest::post("/api/auth/login").anonymous(),
                StatusCode::OK,
            )
            .await
            .unwrap();

        assert_eq!(
            result,
            Fetched::Failure {
                status: StatusCode::UNAUTHORIZED,
                message: Some("Invalid password".to_string()),
            }
        );
        assert!(nav.history().is_empty());
    }

    #[tokio::test]
    async fn unexpected_status_carries_message_field() {
        let mock = MockTransport::new();
        mock.respond(Method::GET, "/api/photos/9", 404, json!({"message": "gone"}));
        let nav = Arc::new(RecordingNavigator::new());

        let result = client(&mock, &nav)
            .fetch::<serde_json::Value>(ApiRequest::get("/api/photos/9"), StatusCode::OK)
            .await
            .unwrap();

        assert_eq!(
            result,
            Fetched::Failure {
                status: StatusCode::NOT_FOUND,
                message: Some("gone".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn malformed_success_body_is_an_error() {
        let mock = MockTransport::new();
        mock.respond_raw(Method::GET, "/api/users/me", 200, bytes::Bytes::from_static(b"<html>"));
        let nav = Arc::new(RecordingNavigator::new());

        let result = client(&mock, &nav)
            .fetch::<shared::types::User>(ApiRequest::get("/api/users/me"), StatusCode::OK)
            .await;

        assert!(matches!(result, Err(ClientError::Json(_))));
    }

    #[test]
    fn segment_encoding_escapes_spaces_and_slashes() {
        assert_eq!(encode_segment("jane doe"), "jane%20doe");
        assert_eq!(encode_segment("a/b"), "a%2Fb");
        assert_eq!(encode_segment("c+d"), "c%2Bd");
    }
}
