//! Shared test utilities: local push-channel and control-endpoint fakes.

#![allow(dead_code)]

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use tradewatch::tui::Message;

/// How long a test waits for any single message before failing.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Binds a local listener and returns it with its `ws://` URL.
pub async fn ws_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no address");
    (listener, format!("ws://{addr}"))
}

/// Returns a `ws://` URL nothing is listening on.
pub async fn refused_url() -> String {
    let (listener, url) = ws_listener().await;
    drop(listener);
    url
}

/// Waits for the next store message, failing the test on timeout.
pub async fn recv(rx: &mut mpsc::UnboundedReceiver<Message>) -> Message {
    tokio::time::timeout(RECV_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for message")
        .expect("message channel closed")
}

/// What the fake control endpoint received.
#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub body: String,
}

/// Serves exactly one HTTP request with `status` and `body`.
///
/// Returns the base URL and a task yielding the captured request.
pub async fn serve_http_once(
    status: u16,
    body: &'static str,
) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let base = format!("http://{}", listener.local_addr().expect("no address"));

    let task = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept failed");
        let captured = read_request(&mut stream).await;

        let reason = match status {
            200 => "OK",
            400 => "Bad Request",
            500 => "Internal Server Error",
            _ => "Status",
        };
        let response = format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream
            .write_all(response.as_bytes())
            .await
            .expect("write failed");
        let _ = stream.shutdown().await;
        captured
    });

    (base, task)
}

/// Accepts one connection and never answers it.
pub async fn serve_http_silent() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let base = format!("http://{}", listener.local_addr().expect("no address"));

    let task = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept failed");
        let _ = read_request(&mut stream).await;
        tokio::time::sleep(Duration::from_secs(3600)).await;
    });

    (base, task)
}

async fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.expect("read failed");
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.expect("read failed");
        assert!(n > 0, "client closed before sending body");
        buf.extend_from_slice(&chunk[..n]);
    }

    CapturedRequest {
        request_line: head.lines().next().unwrap_or_default().to_string(),
        body: String::from_utf8_lossy(&buf[header_end..header_end + content_length]).to_string(),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
