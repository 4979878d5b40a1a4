//! Test utilities and mocks for Dgrelay
//!
//! This module provides common test utilities used across integration tests.

use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use url::Url;

/// Spawn a minimal HTTP server that answers every request with the given
/// status code and sends each captured request body down the channel.
///
/// Good enough for the relay's traffic: small POST requests with a
/// `Content-Length` header, possibly several per connection.
pub async fn spawn_capture_server(status: u16) -> (SocketAddr, mpsc::UnboundedReceiver<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(serve_connection(stream, status, tx.clone()));
        }
    });

    (addr, rx)
}

async fn serve_connection(mut stream: TcpStream, status: u16, tx: mpsc::UnboundedSender<Vec<u8>>) {
    // The client may reuse the connection for several requests.
    while let Some(body) = read_request(&mut stream).await {
        if tx.send(body).is_err() {
            break;
        }

        let response = format!(
            "HTTP/1.1 {} {}\r\ncontent-length: 0\r\n\r\n",
            status,
            reason_phrase(status)
        );
        if stream.write_all(response.as_bytes()).await.is_err() {
            break;
        }
    }
}

/// Read one HTTP request from the stream and return its body.
///
/// Returns `None` on EOF or any read error.
async fn read_request(stream: &mut TcpStream) -> Option<Vec<u8>> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    // Read until the end of the headers
    let header_end = loop {
        if let Some(pos) = find_subsequence(&data, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut buf).await.ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
    };

    let headers = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    // Read the remainder of the body
    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).await.ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
    }

    Some(data[header_end..header_end + content_length].to_vec())
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Test configuration builder
pub struct TestConfigBuilder {
    udp_port: u16,
    buffer_size: usize,
    relay_url: String,
    forward_timeout: u64,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        TestConfigBuilder {
            udp_port: 0,
            buffer_size: 16384,
            relay_url: "http://127.0.0.1:8080/ingest".to_string(),
            forward_timeout: 2,
        }
    }
}

impl TestConfigBuilder {
    /// Create a new test config builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the UDP port (0 lets the OS pick one)
    #[allow(dead_code)]
    pub fn udp_port(mut self, port: u16) -> Self {
        self.udp_port = port;
        self
    }

    /// Set the receive buffer size
    #[allow(dead_code)]
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Set the relay endpoint URL
    pub fn relay_url(mut self, url: &str) -> Self {
        self.relay_url = url.to_string();
        self
    }

    /// Set the forward timeout in seconds
    #[allow(dead_code)]
    pub fn forward_timeout(mut self, secs: u64) -> Self {
        self.forward_timeout = secs;
        self
    }

    /// Build the configuration
    pub fn build(self) -> dgrelay::config::RelayConfig {
        dgrelay::config::RelayConfig {
            listen_addr: "127.0.0.1".parse().unwrap(),
            udp_port: self.udp_port,
            buffer_size: self.buffer_size,
            relay_url: Url::parse(&self.relay_url).unwrap(),
            forward_timeout: self.forward_timeout,
        }
    }
}
