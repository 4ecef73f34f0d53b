//! HTTP transport abstraction for the explorer API.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// HTTP method used by the explorer API calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// An outgoing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub content_type: Option<String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            content_type: None,
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, content_type: impl Into<String>, body: String) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            content_type: Some(content_type.into()),
            body: Some(body),
        }
    }
}

/// A response as seen by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport error type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportError {
    ConnectionFailed(String),
    Timeout,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::ConnectionFailed(e) => write!(f, "Connection failed: {}", e),
            TransportError::Timeout => write!(f, "Timed out"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Abstract HTTP transport trait.
#[async_trait]
pub trait HttpTransport: Send + Sync + 'static {
    /// Send a request and wait for its response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// In-memory transport for testing and demos.
///
/// Answers from a table of canned responses keyed by method and URL and
/// records every request it receives. Unknown routes answer 404.
pub struct MemoryTransport {
    routes: RwLock<HashMap<(Method, String), HttpResponse>>,
    requests: RwLock<Vec<HttpRequest>>,
    offline: RwLock<bool>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(HashMap::new()),
            requests: RwLock::new(Vec::new()),
            offline: RwLock::new(false),
        }
    }

    /// Register the response for a method and URL.
    pub fn respond(&self, method: Method, url: impl Into<String>, response: HttpResponse) {
        self.routes.write().insert((method, url.into()), response);
    }

    /// Make every following request fail with a connection error.
    pub fn set_offline(&self, offline: bool) {
        *self.offline.write() = offline;
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.read().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.read().last().cloned()
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MemoryTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if *self.offline.read() {
            return Err(TransportError::ConnectionFailed(request.url));
        }
        let response = self
            .routes
            .read()
            .get(&(request.method, request.url.clone()))
            .cloned()
            .unwrap_or_else(|| HttpResponse::new(404, "not found"));
        self.requests.write().push(request);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_transport_routes() {
        let transport = MemoryTransport::new();
        transport.respond(Method::Get, "http://x/a", HttpResponse::new(200, "{}"));

        let response = transport.send(HttpRequest::get("http://x/a")).await.unwrap();
        assert!(response.is_success());
        assert_eq!(response.body, "{}");

        let missing = transport.send(HttpRequest::get("http://x/b")).await.unwrap();
        assert_eq!(missing.status, 404);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_memory_transport_offline() {
        let transport = MemoryTransport::new();
        transport.set_offline(true);
        let result = transport.send(HttpRequest::get("http://x/a")).await;
        assert_eq!(result, Err(TransportError::ConnectionFailed("http://x/a".into())));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_status_ranges() {
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(304, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }
}
