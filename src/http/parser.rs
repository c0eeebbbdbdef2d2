//! Request line and header line parsing.
//!
//! These functions work on one line at a time, as delivered by
//! [`BufferedConnection::read_line`](crate::http::bufio::BufferedConnection::read_line),
//! terminator included.

use thiserror::Error;

use crate::http::request::{Method, Version};

/// Longest request line accepted, terminator included.
pub const MAX_REQUEST_LINE: usize = 8192;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("connection closed before a request arrived")]
    Eof,

    #[error("request line too short ({0} bytes)")]
    RequestLineTooShort(usize),

    #[error("request line too long ({len} bytes, limit {max})")]
    RequestLineTooLong { len: usize, max: usize },

    #[error("malformed request line")]
    InvalidRequest,

    #[error("missing or unsupported http version")]
    InvalidVersion,

    #[error("request path is not valid utf-8")]
    InvalidPath,

    #[error("malformed header line")]
    InvalidHeader,

    #[error("connection closed inside the header block")]
    UnterminatedHeaders,

    #[error("more than {max} header lines")]
    TooManyHeaders { max: usize },

    #[error("invalid content-length: {0:?}")]
    InvalidContentLength(String),

    #[error("body of {len} bytes exceeds the limit of {max}")]
    BodyTooLarge { len: usize, max: usize },

    #[error("body truncated: expected {expected} bytes, got {got}")]
    ShortBody { expected: usize, got: usize },
}

/// Tokens of a request line. `path_start` is the byte index of the path
/// within the line, so the caller can turn it into a buffer offset.
#[derive(Debug, PartialEq, Eq)]
pub struct RequestLine<'a> {
    pub method: Method,
    pub path: &'a str,
    pub path_start: usize,
    pub version: Version,
}

/// A header line split on its first colon.
#[derive(Debug, PartialEq, Eq)]
pub enum HeaderLine<'a> {
    /// The blank line that ends the header block.
    End,
    Field { name: &'a str, value: &'a str },
}

pub fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Splits `METHOD SP path SP version CRLF`.
///
/// Runs of spaces separate tokens. An unknown method is accepted; a missing
/// or unrecognized version is not.
pub fn parse_request_line(line: &[u8]) -> Result<RequestLine<'_>, ParseError> {
    if line.len() < 2 {
        return Err(ParseError::RequestLineTooShort(line.len()));
    }
    if line.len() > MAX_REQUEST_LINE {
        return Err(ParseError::RequestLineTooLong {
            len: line.len(),
            max: MAX_REQUEST_LINE,
        });
    }

    let text = std::str::from_utf8(strip_line_ending(line)).map_err(|_| ParseError::InvalidPath)?;

    let mut tokens = text
        .split(' ')
        .scan(0usize, |at, tok| {
            let start = *at;
            *at += tok.len() + 1;
            Some((start, tok))
        })
        .filter(|(_, tok)| !tok.is_empty());

    let (_, method) = tokens.next().ok_or(ParseError::InvalidRequest)?;
    let (path_start, path) = tokens.next().ok_or(ParseError::InvalidRequest)?;
    let (_, version) = tokens.next().ok_or(ParseError::InvalidVersion)?;
    let version = Version::from_token(version).ok_or(ParseError::InvalidVersion)?;

    Ok(RequestLine {
        method: Method::from_token(method),
        path,
        path_start,
        version,
    })
}

/// Parses one line of the header block.
///
/// The value has surrounding spaces and tabs removed. A line without a
/// colon, or with an empty name or value, is rejected. So is a line that
/// was cut off by EOF before its terminator.
pub fn parse_header_line(line: &[u8]) -> Result<HeaderLine<'_>, ParseError> {
    if !line.ends_with(b"\n") {
        return Err(ParseError::UnterminatedHeaders);
    }

    let content = strip_line_ending(line);
    if content.is_empty() {
        return Ok(HeaderLine::End);
    }

    let text = std::str::from_utf8(content).map_err(|_| ParseError::InvalidHeader)?;
    let (name, value) = text.split_once(':').ok_or(ParseError::InvalidHeader)?;

    let name = name.trim();
    let value = value.trim_matches([' ', '\t']);
    if name.is_empty() || value.is_empty() {
        return Err(ParseError::InvalidHeader);
    }

    Ok(HeaderLine::Field { name, value })
}

pub fn parse_content_length(value: &str) -> Result<usize, ParseError> {
    value
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidContentLength(value.to_string()))
}
