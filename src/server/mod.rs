//! Local preview API. One request per connection, handled in accept order.

use std::io::{ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use crate::config::EstimatorConfig;

pub mod api;
pub mod routes;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const BIND_ADDR_ENV: &str = "BEACHHEAD_BIND";

pub fn run_server(bind_addr: &str, config: &EstimatorConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr)?;
    tracing::info!(%bind_addr, "beachhead server listening");
    println!("beachhead server listening on http://{bind_addr}");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, config) {
                    tracing::warn!(%err, "request error");
                }
            }
            Err(err) => tracing::warn!(%err, "connection failed"),
        }
    }

    Ok(())
}

/// Largest request (headers plus body) the server will buffer.
pub const MAX_REQUEST_BYTES: usize = 16_384;
/// A client that stops sending for this long is dropped.
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

pub fn handle_connection(stream: &mut TcpStream, config: &EstimatorConfig) -> std::io::Result<()> {
    stream.set_read_timeout(Some(READ_TIMEOUT))?;
    let Some(raw) = read_request(stream)? else {
        return Ok(());
    };

    let text = String::from_utf8_lossy(&raw);
    let request: &str = &text;
    let (head, body) = request.split_once("\r\n\r\n").unwrap_or((request, ""));
    let request_line = head.lines().next().unwrap_or_default();
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET");
    let path = request_parts.next().unwrap_or("/");

    let response = routes::route_request_with_config(method, path, body, config);
    tracing::debug!(method, path, status = response.status_code, "handled request");
    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()?;
    Ok(())
}

/// Read the header block, then exactly `Content-Length` body bytes.
/// Returns `None` when the client closed without sending anything.
fn read_request<R: Read>(stream: &mut R) -> std::io::Result<Option<Vec<u8>>> {
    let mut buffer = Vec::with_capacity(1024);
    let mut chunk = [0_u8; 4096];

    let header_end = loop {
        if let Some(pos) = find_header_end(&buffer) {
            break pos;
        }
        if buffer.len() >= MAX_REQUEST_BYTES {
            return Err(too_large());
        }
        let read = stream.read(&mut chunk)?;
        if read == 0 {
            return Ok((!buffer.is_empty()).then_some(buffer));
        }
        buffer.extend_from_slice(&chunk[..read]);
    };

    let body_start = header_end + 4;
    let content_length = content_length(&buffer[..header_end]);
    let total = body_start.saturating_add(content_length);
    if total > MAX_REQUEST_BYTES {
        return Err(too_large());
    }
    while buffer.len() < total {
        let read = stream.read(&mut chunk)?;
        if read == 0 {
            return Err(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                "connection closed before the request body was complete",
            ));
        }
        buffer.extend_from_slice(&chunk[..read]);
    }
    buffer.truncate(total);
    Ok(Some(buffer))
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

fn content_length(head: &[u8]) -> usize {
    String::from_utf8_lossy(head)
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

fn too_large() -> std::io::Error {
    std::io::Error::new(ErrorKind::InvalidData, "request exceeds 16 KiB")
}
