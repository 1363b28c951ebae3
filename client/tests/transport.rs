//! Transport tests against a real HTTP/1 server on a random local port.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Request, Response, StatusCode, header};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use photoshare::api::{ApiClient, Fetched};
use photoshare::navigation::RecordingNavigator;
use photoshare::session::Session;
use photoshare::transport::{ApiRequest, HyperTransport, Transport};
use shared::types::{LoginData, PhotoUpload, User};

/// What the server saw.
#[derive(Debug)]
struct Captured {
    method: Method,
    uri: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: Bytes,
}

async fn handle(
    req: Request<Incoming>,
    seen: mpsc::UnboundedSender<Captured>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let header_value = |name: header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let method = req.method().clone();
    let uri = req.uri().to_string();
    let authorization = header_value(header::AUTHORIZATION);
    let content_type = header_value(header::CONTENT_TYPE);
    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => Bytes::new(),
    };

    let (status, reply) = match (method.as_str(), uri.as_str()) {
        ("GET", "/api/users/me") if authorization.as_deref() == Some("Bearer tok") => (
            StatusCode::OK,
            r#"{"id":7,"username":"me","email":"me@example.com"}"#,
        ),
        ("GET", "/api/users/me") => (StatusCode::UNAUTHORIZED, r#"{"detail":"Not authenticated"}"#),
        ("POST", "/api/auth/login") => (
            StatusCode::OK,
            r#"{"access_token":"acc","refresh_token":"ref","token_type":"bearer"}"#,
        ),
        ("POST", "/api/photos") => (StatusCode::OK, r#"{"id":11,"image":"https://img/11.jpg"}"#),
        _ => (StatusCode::NOT_FOUND, r#"{"detail":"Not Found"}"#),
    };

    let _ = seen.send(Captured {
        method,
        uri,
        authorization,
        content_type,
        body,
    });

    let response = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(reply.as_bytes())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())));
    Ok(response)
}

async fn spawn_server() -> (SocketAddr, mpsc::UnboundedReceiver<Captured>) {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let io = TokioIo::new(stream);
            let tx = tx.clone();
            tokio::spawn(async move {
                let service = service_fn(move |req| handle(req, tx.clone()));
                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    eprintln!("Error serving connection: {:?}", err);
                }
            });
        }
    });

    (addr, rx)
}

fn client(addr: SocketAddr, nav: &Arc<RecordingNavigator>) -> ApiClient<HyperTransport> {
    let transport = HyperTransport::new(&format!("http://{}", addr)).unwrap();
    ApiClient::new(transport, nav.clone(), "/templates/login.html")
}

#[tokio::test]
async fn bearer_token_reaches_the_server() {
    let (addr, mut seen) = spawn_server().await;
    let nav = Arc::new(RecordingNavigator::new());
    let api = client(addr, &nav).with_session(Session::new("tok"));

    let me = api.current_user().await.unwrap();

    let user: User = me.ok().unwrap();
    assert_eq!(user.id, 7);
    assert_eq!(user.role, "user");
    let request = seen.recv().await.unwrap();
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok"));
    assert_eq!(request.method, Method::GET);
}

#[tokio::test]
async fn rejected_token_redirects_to_login() {
    let (addr, _seen) = spawn_server().await;
    let nav = Arc::new(RecordingNavigator::new());
    let api = client(addr, &nav).with_session(Session::new("stale"));

    let me = api.current_user().await.unwrap();

    assert_eq!(me, Fetched::Unauthorized);
    assert_eq!(nav.last().unwrap().path, "/templates/login.html");
}

#[tokio::test]
async fn login_is_form_encoded_and_anonymous() {
    let (addr, mut seen) = spawn_server().await;
    let nav = Arc::new(RecordingNavigator::new());
    let api = client(addr, &nav).with_session(Session::new("tok"));

    let tokens = api
        .login(&LoginData {
            username: "a@b.c".to_string(),
            password: "p w".to_string(),
        })
        .await
        .unwrap()
        .ok()
        .unwrap();

    assert_eq!(tokens.refresh_token, "ref");
    let request = seen.recv().await.unwrap();
    assert!(request.authorization.is_none());
    assert_eq!(
        request.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(&request.body[..], b"username=a%40b.c&password=p+w");
}

#[tokio::test]
async fn upload_sends_parseable_multipart() {
    let (addr, mut seen) = spawn_server().await;
    let nav = Arc::new(RecordingNavigator::new());
    let api = client(addr, &nav).with_session(Session::new("tok"));
    let upload = PhotoUpload {
        description: "Harbour".to_string(),
        tags: vec!["sea".to_string(), "dawn".to_string()],
        file_name: "harbour.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
        file: vec![0xff, 0xd8, 0xff, 0x00],
    };

    let photo = api.upload_photo(&upload).await.unwrap().ok().unwrap();
    assert_eq!(photo.id, 11);

    let request = seen.recv().await.unwrap();
    assert_eq!(request.uri, "/api/photos");
    let content_type = request.content_type.unwrap();
    let boundary = multer::parse_boundary(&content_type).unwrap();
    let body = request.body;
    let stream = futures_util::stream::once(async move { Ok::<_, Infallible>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.unwrap();
        fields.push((name, file_name, data));
    }

    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].0, "description");
    assert_eq!(&fields[0].2[..], b"Harbour");
    assert_eq!(&fields[1].2[..], b"sea,dawn");
    assert_eq!(fields[2].1.as_deref(), Some("harbour.jpg"));
    assert_eq!(&fields[2].2[..], &[0xff, 0xd8, 0xff, 0x00]);
}

#[tokio::test]
async fn unreachable_server_is_an_error() {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = HyperTransport::new(&format!("http://{}", addr)).unwrap();
    let result = transport.send(ApiRequest::get("/api/users/me")).await;
    assert!(result.is_err());
}
