// SOMX Feed — HTTP Endpoint
//
// Raw `tokio::net::TcpListener`, no framework dependency. Routes:
//   GET /api/somx?sinceBlock=N   — new purchases since the watermark
//   GET /?sinceBlock=N           — same, for serverless-style root mounts
//   GET /health                  — liveness probe
//   OPTIONS *                    — CORS preflight
//
// One task per connection, one request per connection (Connection: close).

use crate::atoms::constants::{FEED_PATH, HEALTH_PATH, MAX_REQUEST_BYTES, REQUEST_HEAD_TIMEOUT_SECS};
use crate::atoms::error::EngineResult;
use crate::atoms::types::FailureResponse;
use crate::engine::feed::{parse_watermark, FeedService};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// ── Routing ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Feed { since_block: Option<String> },
    Health,
    Preflight,
    NotFound,
    MethodNotAllowed,
}

/// Route a request line's method and target ("/api/somx?sinceBlock=5").
pub fn route(method: &str, target: &str) -> Route {
    if method == "OPTIONS" {
        return Route::Preflight;
    }
    let Ok(url) = url::Url::parse(&format!("http://localhost{}", target)) else {
        return Route::NotFound;
    };
    let path = url.path().trim_end_matches('/');
    let known = path.is_empty() || path == FEED_PATH || path == HEALTH_PATH;
    if !known {
        return Route::NotFound;
    }
    if method != "GET" {
        return Route::MethodNotAllowed;
    }
    if path == HEALTH_PATH {
        return Route::Health;
    }
    let since_block = url
        .query_pairs()
        .find(|(k, _)| k == "sinceBlock")
        .map(|(_, v)| v.into_owned());
    Route::Feed { since_block }
}

// ── Server ─────────────────────────────────────────────────────────────

/// Bind the configured address and serve until the task is dropped.
pub async fn run_server(service: Arc<FeedService>) -> EngineResult<()> {
    let addr = service.config().bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Bind {} failed: {}", addr, e))?;
    if service.config().bind_address != "127.0.0.1" && service.config().bind_address != "localhost" {
        warn!("[server] Binding to {} — the endpoint has no auth; put it behind a proxy", addr);
    }
    serve(listener, service).await
}

/// Accept loop over an already-bound listener.
pub async fn serve(listener: TcpListener, service: Arc<FeedService>) -> EngineResult<()> {
    info!("[server] Listening on http://{}{}", listener.local_addr()?, FEED_PATH);
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let svc = service.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, svc).await {
                        warn!("[server] Request error from {}: {}", peer.ip(), e);
                    }
                });
            }
            Err(e) => {
                warn!("[server] Accept error: {}", e);
            }
        }
    }
}

/// Read until the request line has arrived, the peer closes, or
/// `MAX_REQUEST_BYTES` is reached. A segmented request line is reassembled.
async fn read_request_head<R: AsyncRead + Unpin>(reader: &mut R) -> std::io::Result<Vec<u8>> {
    let mut head = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    while head.len() < MAX_REQUEST_BYTES {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&chunk[..n]);
        if chunk[..n].contains(&b'\n') {
            break;
        }
    }
    Ok(head)
}

/// Method and target from "METHOD /target HTTP/1.x".
fn request_line(head: &[u8]) -> Option<(String, String)> {
    let raw = String::from_utf8_lossy(head);
    let mut parts = raw.lines().next()?.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();
    Some((method, target))
}

async fn handle_connection(mut stream: TcpStream, service: Arc<FeedService>) -> EngineResult<()> {
    let head = tokio::time::timeout(
        Duration::from_secs(REQUEST_HEAD_TIMEOUT_SECS),
        read_request_head(&mut stream),
    )
    .await
    .map_err(|_| format!("No request line within {}s", REQUEST_HEAD_TIMEOUT_SECS))??;
    if head.is_empty() {
        return Ok(());
    }
    let Some((method, target)) = request_line(&head) else {
        return send_json(&mut stream, 400, &FailureResponse::new("Malformed request")).await;
    };
    let (method, target) = (method.as_str(), target.as_str());
    let request_id = uuid::Uuid::new_v4().simple().to_string();
    let request_id = &request_id[..8];

    match route(method, target) {
        Route::Preflight => {
            let resp = "HTTP/1.1 204 No Content\r\nAccess-Control-Allow-Origin: *\r\nAccess-Control-Allow-Methods: GET, OPTIONS\r\nAccess-Control-Allow-Headers: Content-Type\r\nConnection: close\r\n\r\n";
            stream.write_all(resp.as_bytes()).await?;
            Ok(())
        }
        Route::Health => send_json(&mut stream, 200, &json!({ "ok": true })).await,
        Route::NotFound => send_json(&mut stream, 404, &FailureResponse::new(format!("No route for {}", target))).await,
        Route::MethodNotAllowed => {
            send_json(&mut stream, 405, &FailureResponse::new(format!("Method {} not allowed", method))).await
        }
        Route::Feed { since_block } => {
            let watermark = parse_watermark(since_block.as_deref());
            info!("[server] {} GET feed sinceBlock={}", request_id, watermark);
            match service.new_purchases(watermark).await {
                Ok(resp) => send_json(&mut stream, 200, &resp).await,
                Err(e) => {
                    let status = e.status_code();
                    if status == 502 {
                        warn!("[server] {} upstream failure: {}", request_id, e);
                    } else {
                        error!("[server] {} feed endpoint error: {}", request_id, e);
                    }
                    send_json(&mut stream, status, &FailureResponse::from(&e)).await
                }
            }
        }
    }
}

async fn send_json<T: Serialize>(stream: &mut TcpStream, status: u16, body: &T) -> EngineResult<()> {
    let body = serde_json::to_string(body)?;
    let resp = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nCache-Control: no-store\r\nAccess-Control-Allow-Origin: *\r\nConnection: close\r\n\r\n{}",
        status,
        reason_phrase(status),
        body.len(),
        body
    );
    stream.write_all(resp.as_bytes()).await?;
    stream.flush().await?;
    Ok(())
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "",
    }
}
