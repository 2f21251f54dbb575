//! One-shot HTTP responder for exercising the client without the network.

use crate::client::Client;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub(crate) struct Responder {
    base_url: String,
    request: JoinHandle<String>,
}

impl Responder {
    /// Serve exactly one response, capturing the raw request head.
    pub(crate) async fn start(
        status: u16,
        content_type: Option<&str>,
        body: impl AsRef<[u8]>,
    ) -> Self {
        let body = body.as_ref();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut response = format!(
            "HTTP/1.1 {} Status\r\nContent-Length: {}\r\nConnection: close\r\n",
            status,
            body.len()
        );
        if let Some(content_type) = content_type {
            response.push_str(&format!("Content-Type: {}\r\n", content_type));
        }
        response.push_str("\r\n");
        let mut response = response.into_bytes();
        response.extend_from_slice(body);

        let request = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut chunk = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&chunk[..n]);
            }
            socket.write_all(&response).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&head).into_owned()
        });

        Self {
            base_url: format!("http://{}", addr),
            request,
        }
    }

    pub(crate) fn client(&self) -> Client {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        Client::with_http_client("test-key", "io", http)
            .unwrap()
            .with_base_url(&self.base_url)
    }

    /// The request head as received, e.g. `GET /history?... HTTP/1.1\r\n...`.
    pub(crate) async fn request(self) -> String {
        self.request.await.unwrap()
    }
}

/// First line of a captured request, without the protocol suffix.
pub(crate) fn request_target(request: &str) -> &str {
    let line = request.lines().next().unwrap_or_default();
    line.strip_suffix(" HTTP/1.1").unwrap_or(line)
}
