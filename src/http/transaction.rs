//! One request, one response.
//!
//! [`handle_transaction`] reads a request off a [`BufferedConnection`],
//! dispatches it and writes the answer. A request that fails to parse gets
//! no answer at all; the caller is expected to drop the connection. Once
//! parsing succeeds, exactly one response goes out.

use std::fmt::Display;
use std::io;

use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::http::bufio::{BufferedConnection, Span};
use crate::http::parser::{
    HeaderLine, MAX_REQUEST_LINE, ParseError, parse_content_length, parse_header_line,
    parse_request_line,
};
use crate::http::request::{HeaderName, Request};
use crate::http::response::{Response, StatusCode};
use crate::http::writer;
use crate::routes;
use crate::server::ServerContext;

/// Value of the `Server` response header.
pub const SERVER_NAME: &str = concat!("bastion/", env!("CARGO_PKG_VERSION"));

/// Longest header line accepted, terminator included.
pub const MAX_HEADER_LINE: usize = 8192;

/// Most header lines accepted in one request.
pub const MAX_HEADER_COUNT: usize = 100;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl TransactionError {
    /// The peer went away cleanly between requests.
    pub fn is_eof(&self) -> bool {
        matches!(self, TransactionError::Parse(ParseError::Eof))
    }
}

/// What the connection loop needs to know after a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub status: StatusCode,
    pub keep_alive: bool,
}

/// State of the request being handled.
pub struct Transaction<'c, S> {
    conn: &'c mut BufferedConnection<S>,
    pub ctx: &'c ServerContext,
    pub request: Request,
    pub response: Response,
    /// Subject recovered from a session token, if the request carried one.
    pub subject: Option<String>,
}

fn span_str<S>(conn: &BufferedConnection<S>, span: Span) -> &str
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    conn.slice(span)
        .and_then(|b| std::str::from_utf8(b).ok())
        .unwrap_or("")
}

impl<'c, S> Transaction<'c, S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(conn: &'c mut BufferedConnection<S>, ctx: &'c ServerContext, request: Request) -> Self {
        Self {
            conn,
            ctx,
            request,
            response: Response::new(),
            subject: None,
        }
    }

    /// The request target as sent, query string included.
    pub fn path(&self) -> &str {
        span_str(&*self.conn, self.request.path)
    }

    /// The request target without its query string.
    pub fn target(&self) -> &str {
        let path = self.path();
        path.split_once('?').map_or(path, |(p, _)| p)
    }

    pub fn body(&self) -> &[u8] {
        self.request
            .body
            .and_then(|span| self.conn.slice(span))
            .unwrap_or_default()
    }

    pub async fn send(&mut self) -> io::Result<()> {
        writer::send_response(&mut *self.conn, &mut self.response).await
    }

    pub async fn send_error(&mut self, status: StatusCode, message: impl Display) -> io::Result<()> {
        self.response.error(status, message);
        self.send().await
    }

    pub async fn send_not_found(&mut self) -> io::Result<()> {
        self.response.not_found(span_str(&*self.conn, self.request.path));
        self.send().await
    }

    /// Sends a 200 head describing `size` bytes of `mime`, then the file.
    pub async fn send_file(&mut self, file: &mut File, size: u64, mime: &str) -> io::Result<()> {
        self.response.status = StatusCode::Ok;
        self.response.add_header("Content-Length", size);
        self.response.add_header("Content-Type", mime);
        writer::send_head(&mut *self.conn, &mut self.response).await?;

        let sent = self.conn.send_file(file, size).await?;
        if sent != size {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("file ended after {} of {} bytes", sent, size),
            ));
        }
        Ok(())
    }
}

/// Reads the request line, the header block and the body, if any.
pub async fn read_request<S>(
    conn: &mut BufferedConnection<S>,
    max_body_bytes: usize,
) -> Result<Request, TransactionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut request = Request::default();

    let line = conn.read_line_bounded(MAX_REQUEST_LINE).await?;
    if line.is_empty() {
        return Err(ParseError::Eof.into());
    }
    let bytes = conn.slice(line).ok_or(ParseError::InvalidRequest)?;
    let parsed = parse_request_line(bytes)?;
    request.method = parsed.method;
    request.version = parsed.version;
    request.path = Span::new(line.offset + parsed.path_start, parsed.path.len());

    let mut fields = 0;
    loop {
        let line = conn.read_line_bounded(MAX_HEADER_LINE).await?;
        if line.is_empty() {
            return Err(ParseError::UnterminatedHeaders.into());
        }
        if line.len > MAX_HEADER_LINE {
            return Err(ParseError::InvalidHeader.into());
        }

        let bytes = conn.slice(line).ok_or(ParseError::InvalidHeader)?;
        let header = parse_header_line(bytes)?;
        if matches!(header, HeaderLine::Field { .. }) {
            fields += 1;
            if fields > MAX_HEADER_COUNT {
                return Err(ParseError::TooManyHeaders {
                    max: MAX_HEADER_COUNT,
                }
                .into());
            }
        }

        match header {
            HeaderLine::End => break,
            HeaderLine::Field { name, value } if name.eq_ignore_ascii_case("Content-Length") => {
                request.content_length = parse_content_length(value)?;
            }
            HeaderLine::Field { name, value } => {
                request.headers.retain(name, value);
            }
        }
    }

    if request.content_length > max_body_bytes {
        return Err(ParseError::BodyTooLarge {
            len: request.content_length,
            max: max_body_bytes,
        }
        .into());
    }

    if request.content_length > 0 {
        let body = conn.read_exact(request.content_length).await?;
        if body.len != request.content_length {
            return Err(ParseError::ShortBody {
                expected: request.content_length,
                got: body.len,
            }
            .into());
        }
        request.body = Some(body);
    }

    Ok(request)
}

/// Runs one full transaction on `conn`.
pub async fn handle_transaction<S>(
    conn: &mut BufferedConnection<S>,
    ctx: &ServerContext,
) -> Result<Outcome, TransactionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = read_request(conn, ctx.max_body_bytes).await?;
    let keep_alive = request.keep_alive();

    let mut ta = Transaction::new(conn, ctx, request);
    ta.response.add_header("Server", SERVER_NAME);
    ta.response
        .add_header("Connection", if keep_alive { "keep-alive" } else { "close" });

    routes::dispatch(&mut ta).await?;

    tracing::debug!(
        method = ?ta.request.method,
        path = %ta.path(),
        status = ta.response.status.as_u16(),
        accept = ta.request.header(HeaderName::Accept).unwrap_or("-"),
        keep_alive,
        "request served"
    );

    Ok(Outcome {
        status: ta.response.status,
        keep_alive,
    })
}
