use std::sync::{Arc, Mutex};

use poem::{
    EndpointExt, Request, Response, Route, Server, handler,
    http::StatusCode,
    listener::{Acceptor, Listener, TcpListener},
    post,
    web::Data,
};
use quickchart_client::{ChartClient, ChartError};
use serde_json::{Value, json};

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x01, 0xfe];

struct RecordedRequest {
    path: String,
    content_type: Option<String>,
    body: Value,
}

#[derive(Default)]
struct Recorder {
    requests: Mutex<Vec<RecordedRequest>>,
}

impl Recorder {
    fn record(&self, req: &Request, body: &str) {
        self.requests.lock().unwrap().push(RecordedRequest {
            path: req.uri().path().to_string(),
            content_type: req.content_type().map(str::to_string),
            body: serde_json::from_str(body).unwrap_or(Value::Null),
        });
    }
}

#[handler]
async fn create_short_url(req: &Request, body: String, recorder: Data<&Arc<Recorder>>) -> Response {
    recorder.record(req, &body);
    Response::builder()
        .status(StatusCode::OK)
        .content_type("application/json")
        .body(json!({"status": true, "url": "https://quickchart.io/chart/render/zf-test"}).to_string())
}

#[handler]
async fn render_chart(req: &Request, body: String, recorder: Data<&Arc<Recorder>>) -> Response {
    recorder.record(req, &body);
    Response::builder()
        .status(StatusCode::OK)
        .content_type("image/png")
        .body(PNG_BYTES.to_vec())
}

#[handler]
async fn fail(req: &Request, body: String, recorder: Data<&Arc<Recorder>>) -> Response {
    recorder.record(req, &body);
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .body("Rendering failed")
}

/// Serve `app` on a loopback port and return that port.
async fn spawn_service(route: Route, recorder: Arc<Recorder>) -> u16 {
    let acceptor = TcpListener::bind("127.0.0.1:0")
        .into_acceptor()
        .await
        .expect("Failed to bind fake chart service");
    let port = acceptor.local_addr()[0]
        .as_socket_addr()
        .expect("Fake chart service has no socket address")
        .port();

    tokio::spawn(Server::new_with_acceptor(acceptor).run(route.data(recorder)));
    port
}

fn healthy_service() -> Route {
    Route::new()
        .at("/chart/create", post(create_short_url))
        .at("/chart", post(render_chart))
}

fn failing_service() -> Route {
    Route::new()
        .at("/chart/create", post(fail))
        .at("/chart", post(fail))
}

fn local_client(port: u16) -> ChartClient {
    ChartClient::with_target(Some("http"), Some("127.0.0.1"), Some(port))
        .with_config(r#"{"type":"bar","data":{"labels":["Q1","Q2"],"datasets":[{"data":[3,7]}]}}"#)
}

#[tokio::test]
async fn test_short_url_round_trip() {
    let recorder = Arc::new(Recorder::default());
    let port = spawn_service(healthy_service(), recorder.clone()).await;

    let client = local_client(port).with_key("abc123").with_version("4");
    let url = client.request_short_url().await.expect("short url request failed");

    assert_eq!(url, "https://quickchart.io/chart/render/zf-test");

    let requests = recorder.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/chart/create");
    assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(requests[0].body, client.build_payload().unwrap());
    assert_eq!(requests[0].body["key"], "abc123");
    assert_eq!(requests[0].body["version"], "4");
}

#[tokio::test]
async fn test_short_url_server_error_is_api_error() {
    let recorder = Arc::new(Recorder::default());
    let port = spawn_service(failing_service(), recorder.clone()).await;

    let err = local_client(port)
        .request_short_url()
        .await
        .expect_err("500 must not produce a url");

    assert!(matches!(err, ChartError::Api(_)));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
    assert_eq!(err.response().unwrap().text(), "Rendering failed");
}

#[tokio::test]
async fn test_image_bytes_are_unmodified() {
    let recorder = Arc::new(Recorder::default());
    let port = spawn_service(healthy_service(), recorder.clone()).await;

    let client = local_client(port).with_format("png").with_size(640, 480);
    let bytes = client.request_image_bytes().await.expect("render request failed");

    assert_eq!(bytes, PNG_BYTES);

    let requests = recorder.requests.lock().unwrap();
    assert_eq!(requests[0].path, "/chart");
    assert_eq!(requests[0].body["width"], 640);
    assert_eq!(requests[0].body["height"], 480);
    assert!(requests[0].body.get("key").is_none());
}

#[tokio::test]
async fn test_write_image_to_path() {
    let recorder = Arc::new(Recorder::default());
    let port = spawn_service(healthy_service(), recorder).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chart.png");

    local_client(port)
        .write_image_to_path(&path)
        .await
        .expect("writing chart failed");

    assert_eq!(std::fs::read(&path).unwrap(), PNG_BYTES);
}

#[tokio::test]
async fn test_image_server_error_leaves_no_file() {
    let recorder = Arc::new(Recorder::default());
    let port = spawn_service(failing_service(), recorder).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chart.png");

    let err = local_client(port).write_image_to_path(&path).await.unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let acceptor = TcpListener::bind("127.0.0.1:0").into_acceptor().await.unwrap();
    let port = acceptor.local_addr()[0].as_socket_addr().unwrap().port();
    drop(acceptor);

    let err = local_client(port).request_image_bytes().await.unwrap_err();
    assert!(matches!(err, ChartError::Transport(_)));
}

#[tokio::test]
async fn test_missing_config_never_reaches_service() {
    let recorder = Arc::new(Recorder::default());
    let port = spawn_service(healthy_service(), recorder.clone()).await;

    let client = ChartClient::with_target(Some("http"), Some("127.0.0.1"), Some(port));

    assert!(matches!(
        client.request_short_url().await,
        Err(ChartError::MissingConfig { .. })
    ));
    assert!(matches!(
        client.build_url(),
        Err(ChartError::MissingConfig { .. })
    ));
    assert!(recorder.requests.lock().unwrap().is_empty());
}
