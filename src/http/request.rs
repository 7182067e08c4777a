/// Represents a parsed HTTP request line.
///
/// Only the request line is ever read; headers and bodies are ignored. The
/// method is kept for logging but never dispatched on: every request is
/// served as a GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The method token as sent by the client (e.g. "GET")
    pub method: String,
    /// The request target, kept verbatim (e.g. "/index.html")
    pub target: String,
    /// HTTP version token (typically "HTTP/1.0")
    pub version: String,
}

impl Request {
    /// Creates a request from its three request-line tokens.
    pub fn new(
        method: impl Into<String>,
        target: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
            version: version.into(),
        }
    }
}
