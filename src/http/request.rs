use crate::http::bufio::Span;

/// HTTP request methods.
///
/// Only GET and POST are served. Anything else parses as `Unknown` and is
/// turned away with 501 at dispatch time rather than failing the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// GET - Retrieve a resource
    #[default]
    GET,
    /// POST - Submit data
    POST,
    /// Any other token in the method position
    Unknown,
}

impl Method {
    /// Parses a method token. Matching is case-sensitive.
    ///
    /// ```
    /// # use bastion::http::request::Method;
    /// assert_eq!(Method::from_token("POST"), Method::POST);
    /// assert_eq!(Method::from_token("post"), Method::Unknown);
    /// ```
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            _ => Method::Unknown,
        }
    }
}

/// Protocol versions this server speaks. HTTP/0.9 is not among them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
    Http10,
    #[default]
    Http11,
}

impl Version {
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "HTTP/1.1" => Some(Version::Http11),
            "HTTP/1.0" => Some(Version::Http10),
            _ => None,
        }
    }
}

/// The request headers the server acts on. Everything else is dropped
/// after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderName {
    Connection,
    Cookie,
    Accept,
    ContentType,
}

impl HeaderName {
    const ALL: [HeaderName; 4] = [
        HeaderName::Connection,
        HeaderName::Cookie,
        HeaderName::Accept,
        HeaderName::ContentType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderName::Connection => "Connection",
            HeaderName::Cookie => "Cookie",
            HeaderName::Accept => "Accept",
            HeaderName::ContentType => "Content-Type",
        }
    }

    /// Case-insensitive lookup of a recognized header name.
    pub fn recognize(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|h| h.as_str().eq_ignore_ascii_case(name))
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

/// Fixed table of recognized header values, one slot per [`HeaderName`].
#[derive(Debug, Clone, Default)]
pub struct RequestHeaders {
    values: [Option<String>; 4],
}

impl RequestHeaders {
    pub fn get(&self, name: HeaderName) -> Option<&str> {
        self.values[name.slot()].as_deref()
    }

    /// Stores `value` when `name` is recognized. Returns whether it was kept.
    pub fn retain(&mut self, name: &str, value: &str) -> bool {
        match HeaderName::recognize(name) {
            Some(h) => {
                self.values[h.slot()] = Some(value.to_string());
                true
            }
            None => false,
        }
    }
}

/// A parsed request.
///
/// `path` and `body` point into the connection buffer and are only
/// meaningful during the transaction that parsed them.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub method: Method,
    pub version: Version,
    pub path: Span,
    pub body: Option<Span>,
    pub content_length: usize,
    pub headers: RequestHeaders,
}

impl Request {
    pub fn header(&self, name: HeaderName) -> Option<&str> {
        self.headers.get(name)
    }

    /// Whether the connection survives this request.
    ///
    /// HTTP/1.1 keeps the connection unless the client sends
    /// `Connection: close`. HTTP/1.0 always closes.
    pub fn keep_alive(&self) -> bool {
        match self.version {
            Version::Http10 => false,
            Version::Http11 => !self
                .header(HeaderName::Connection)
                .is_some_and(|v| v.eq_ignore_ascii_case("close")),
        }
    }
}
