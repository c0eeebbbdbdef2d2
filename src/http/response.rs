use std::fmt::Write;

use crate::buffer::ByteBuffer;

/// Longest header value written; longer values are cut off.
pub const MAX_HEADER_LEN: usize = 2048;

/// Longest error message body written by [`Response::error`].
pub const MAX_ERROR_LEN: usize = 2048;

/// HTTP status codes the server can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 403 Permission Denied
    PermissionDenied,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
    /// 503 Service Unavailable
    ServiceUnavailable,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// ```
    /// # use bastion::http::response::StatusCode;
    /// assert_eq!(StatusCode::PermissionDenied.as_u16(), 403);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::PermissionDenied => 403,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
            StatusCode::ServiceUnavailable => 503,
        }
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::PermissionDenied => "Permission Denied",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }
}

/// Response state accumulated during one transaction.
///
/// Headers are kept pre-serialized, one `Name: value\r\n` line each, in the
/// order they were added.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: ByteBuffer,
    pub body: ByteBuffer,
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::Ok,
            headers: ByteBuffer::with_capacity(1024),
            body: ByteBuffer::with_capacity(0),
        }
    }

    /// Appends a header line. Values longer than [`MAX_HEADER_LEN`] are
    /// truncated.
    pub fn add_header(&mut self, key: &str, value: impl std::fmt::Display) {
        self.headers.append_str(key);
        self.headers.append_str(": ");
        let start = self.headers.len();
        // Writing into a ByteBuffer cannot fail.
        let _ = write!(self.headers, "{}", value);
        self.headers.truncate_to(start + MAX_HEADER_LEN);
        self.headers.append_str("\r\n");
    }

    /// Sets the status and replaces the body with a plain-text message.
    pub fn error(&mut self, status: StatusCode, message: impl std::fmt::Display) {
        self.status = status;
        self.body.reset(0);
        let _ = write!(self.body, "{}", message);
        self.body.truncate_to(MAX_ERROR_LEN);
    }

    pub fn not_found(&mut self, path: &str) {
        self.error(StatusCode::NotFound, format_args!("File {} not found", path));
    }

    /// Sets a 200 JSON body.
    pub fn json(&mut self, body: &str) {
        self.status = StatusCode::Ok;
        self.add_header("Content-Type", "application/json");
        self.body.append_str(body);
    }

    /// Looks up a header that has already been added. Names match
    /// case-insensitively.
    pub fn header(&self, key: &str) -> Option<&str> {
        std::str::from_utf8(self.headers.as_slice())
            .ok()?
            .split("\r\n")
            .filter_map(|line| line.split_once(": "))
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
