use std::fmt;

use serde::Serialize;
use tracing::error;

pub const OK: &str = "HTTP/1.1 200 OK";
pub const CREATED: &str = "HTTP/1.1 201 Created";
pub const NO_CONTENT: &str = "HTTP/1.1 204 No Content";
pub const BAD_REQUEST: &str = "HTTP/1.1 400 Bad Request";
pub const NOT_FOUND: &str = "HTTP/1.1 404 Not Found";
pub const INTERNAL_SERVER_ERROR: &str = "HTTP/1.1 500 Internal Server Error";

#[derive(Debug)]
pub struct Response {
    pub(crate) status_line: &'static str,
    pub(crate) headers: Vec<String>,
    pub(crate) content: Option<String>,
}

impl Response {
    pub fn new() -> Self {
        Self {
            status_line: OK,
            headers: Vec::new(),
            content: None,
        }
    }

    /// A response with a JSON body and matching `Content-Type`/`Content-Length` headers.
    pub fn json<T: Serialize + ?Sized>(status_line: &'static str, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self::new()
                .status_line(status_line)
                .append_header("Content-Type: application/json; charset=utf-8")
                .body(body),
            Err(e) => {
                error!(error = %e, "failed to serialize response body");
                Self::error(INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }

    /// `{"error": message}` with the given status.
    pub fn error(status_line: &'static str, message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string();
        Self::new()
            .status_line(status_line)
            .append_header("Content-Type: application/json; charset=utf-8")
            .body(body)
    }

    pub fn status_line(mut self, status_line: &'static str) -> Self {
        self.status_line = status_line;
        self
    }

    pub fn get_status_line(&self) -> &'static str {
        self.status_line
    }

    pub fn append_header(mut self, header: impl Into<String>) -> Self {
        self.headers.push(header.into());
        self
    }

    pub fn push_header(&mut self, header: impl Into<String>) {
        self.headers.push(header.into());
    }

    pub fn body(mut self, content: String) -> Self {
        self.content = Some(content);
        self
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut response = String::new();
        response.push_str(self.status_line);
        response.push_str("\r\n");
        for header in self.headers.iter() {
            response.push_str(header);
            response.push_str("\r\n");
        }
        let content = self.content.as_deref().unwrap_or("");
        response.push_str(&format!("Content-Length: {}\r\n", content.len()));
        // one request per connection
        response.push_str("Connection: close\r\n");
        response.push_str("\r\n");
        response.push_str(content);
        write!(f, "{}", response)
    }
}
