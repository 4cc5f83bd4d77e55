use crate::response::{Response, NO_CONTENT};

pub const ALLOWED_METHODS: &str = "GET,POST";
pub const ALLOWED_HEADERS: &str = "Content-Type,Authorization";

/// Single-origin CORS policy.
///
/// Every response names the configured origin; browsers refuse the response for any other
/// origin. The server itself still answers everyone.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    origin: String,
}

impl CorsPolicy {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }

    pub fn apply(&self, response: &mut Response) {
        response.push_header(format!("Access-Control-Allow-Origin: {}", self.origin));
        response.push_header("Vary: Origin");
    }

    /// The answer to an `OPTIONS` preflight.
    pub fn preflight(&self) -> Response {
        let mut response = Response::new()
            .status_line(NO_CONTENT)
            .append_header(format!("Access-Control-Allow-Methods: {ALLOWED_METHODS}"))
            .append_header(format!("Access-Control-Allow-Headers: {ALLOWED_HEADERS}"));
        self.apply(&mut response);
        response
    }
}
