//! Integration tests for the fwatch-common API client against a local
//! one-shot HTTP server.

use fwatch_common::{BiliClient, BiliConfig, FwatchError, Uid};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves `body` once with the given status and returns the raw request.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });

    (base, handle)
}

fn client(base: &str) -> BiliClient {
    BiliClient::new(
        BiliConfig::new(base)
            .with_space_base("https://space.example")
            .with_timeouts(5, 5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_follower_count_request_shape() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"code":0,"message":"0","ttl":1,"data":{"mid":546195,"following":3,"follower":4321}}"#,
    )
    .await;

    let uid = Uid::parse("546195").unwrap();
    let followers = client(&base).follower_count(&uid).await.unwrap();
    assert_eq!(followers, 4321);

    let request = server.await.unwrap().to_ascii_lowercase();
    assert!(request.starts_with("get /x/relation/stat?vmid=546195 "));
    assert!(request.contains("referer: https://space.example/546195/"));
    assert!(request.contains("user-agent: mozilla/5.0"));
}

#[tokio::test]
async fn test_follower_count_remote_error() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"code":-352,"message":"risk control","ttl":1}"#,
    )
    .await;

    let err = client(&base)
        .follower_count(&Uid::parse("1").unwrap())
        .await
        .unwrap_err();
    assert!(err.is_remote());
    assert_eq!(err.to_string(), "API error: risk control (code: -352)");
    server.await.unwrap();
}

#[tokio::test]
async fn test_http_status_is_transport_error() {
    let (base, server) = serve_once("503 Service Unavailable", "{}").await;

    let err = client(&base)
        .follower_count(&Uid::parse("1").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, FwatchError::Network { .. }));
    assert!(err.to_string().contains("503"));
    server.await.unwrap();
}

#[tokio::test]
async fn test_rejection_with_http_status_keeps_platform_code() {
    let (base, server) = serve_once(
        "412 Precondition Failed",
        r#"{"code":-412,"message":"request was intercepted","ttl":1}"#,
    )
    .await;

    let err = client(&base)
        .follower_count(&Uid::parse("1").unwrap())
        .await
        .unwrap_err();
    assert!(err.is_remote());
    assert_eq!(
        err.to_string(),
        "API error: request was intercepted (code: -412)"
    );
    server.await.unwrap();
}

#[tokio::test]
async fn test_malformed_body_is_not_remote() {
    let (base, server) = serve_once("200 OK", "<html>blocked</html>").await;

    let err = client(&base)
        .follower_count(&Uid::parse("1").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, FwatchError::Serialization(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn test_resolve_name() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"code":0,"message":"0","data":{"mid":2,"name":"tester"}}"#,
    )
    .await;

    let name = client(&base).resolve_name(&Uid::parse("2").unwrap()).await;
    assert_eq!(name.as_deref(), Some("tester"));

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /x/space/acc/info?mid=2 "));
}

#[tokio::test]
async fn test_resolve_name_rejected_is_none() {
    let (base, server) = serve_once("200 OK", r#"{"code":-404,"message":"nothing"}"#).await;

    let name = client(&base).resolve_name(&Uid::parse("2").unwrap()).await;
    assert!(name.is_none());
    server.await.unwrap();
}
