/// Protocol version written on every status line.
pub const HTTP_VERSION: &str = "HTTP/1.0";

/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): the file was found and follows the head
/// - `NotFound` (404): anything that prevented opening the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 NOT FOUND
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use docroot::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the reason phrase sent on the status line.
    ///
    /// The 404 phrase is upper-case on the wire.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "NOT FOUND",
        }
    }

    /// The full status line without its line terminator.
    pub fn status_line(&self) -> String {
        format!("{} {} {}", HTTP_VERSION, self.as_u16(), self.reason_phrase())
    }
}

/// Status line and headers of a response.
///
/// The body, if any, is streamed separately after the head has been sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    /// The HTTP status code
    pub status: StatusCode,
    /// Headers in the order they will be written
    pub headers: Vec<(String, String)>,
}

impl ResponseHead {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    /// Head for a found file.
    pub fn ok(content_type: &str) -> Self {
        Self::new(StatusCode::Ok).header("Content-Type", content_type)
    }

    /// Head for anything that could not be opened.
    ///
    /// The content type of the requested name is still reported.
    pub fn not_found(content_type: &str) -> Self {
        Self::new(StatusCode::NotFound).header("Content-Type", content_type)
    }

    /// Appends a header; an empty value is written as `Name: `.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Serializes the head, blank line included.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64);

        buf.extend_from_slice(self.status.status_line().as_bytes());
        buf.extend_from_slice(b"\r\n");

        for (k, v) in &self.headers {
            buf.extend_from_slice(k.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(v.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }

        // Header/body separator
        buf.extend_from_slice(b"\r\n");

        buf
    }
}
