//! Test utilities: a scripted in-memory [`Transport`].
//!
//! Responses are queued per `(method, path)`; every request that reaches the
//! transport is recorded so tests can assert on verbs, paths, headers and
//! bodies. Unscripted requests get a 404 with a FastAPI-style body.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::{Method, StatusCode};
use serde_json::Value;

use crate::error::ClientError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// A request as the transport saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Default)]
struct Script {
    responses: HashMap<(Method, String), VecDeque<ApiResponse>>,
    requests: Vec<RecordedRequest>,
}

/// Cheaply cloneable; clones share the script and the request log.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Script>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response for `method path`. Several responses for the same
    /// route are served in order; the last one repeats.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.respond_raw(method, path, status, Bytes::from(body.to_string()))
    }

    pub fn respond_raw(&self, method: Method, path: &str, status: u16, body: Bytes) -> &Self {
        let response = ApiResponse {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        };
        self.lock()
            .responses
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// `"METHOD path"` of every request, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock()
            .requests
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn answer(&self, request: &ApiRequest) -> ApiResponse {
        let (content_type, body) = request.body.encode();
        let mut script = self.lock();
        script.requests.push(RecordedRequest {
            method: request.method.clone(),
            path: request.path.clone(),
            bearer: request.bearer_token().map(str::to_string),
            content_type,
            body,
        });

        let key = (request.method.clone(), request.path.clone());
        match script.responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(not_found),
            Some(queue) => queue.front().cloned().unwrap_or_else(not_found),
            None => not_found(),
        }
    }
}

fn not_found() -> ApiResponse {
    ApiResponse {
        status: StatusCode::NOT_FOUND,
        body: Bytes::from_static(br#"{"detail":"Not Found"}"#),
    }
}

impl Transport for MockTransport {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send {
        let response = self.answer(&request);
        async move { Ok(response) }
    }
}

/// Transport whose every call fails below the HTTP level, as when the server
/// is unreachable.
#[derive(Debug, Clone, Default)]
pub struct FailingTransport;

impl Transport for FailingTransport {
    fn send(
        &self,
        _request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send {
        async move {
            Err(ClientError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        }
    }
}
