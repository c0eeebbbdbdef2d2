//! Buffered reads and writes over one client stream.
//!
//! Everything received on a connection is appended to a single
//! [`ByteBuffer`]. Reads hand back [`Span`]s, which are offsets into that
//! buffer rather than borrowed slices, so the caller can keep reading while
//! holding on to the request line, headers and body of the current request.
//!
//! Spans stay meaningful until [`BufferedConnection::compact`] runs. The
//! transaction loop compacts between requests only, so a span must never
//! outlive the transaction that produced it.

use std::io;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::buffer::ByteBuffer;

/// Initial allocation of a connection buffer.
pub const BUFSIZE: usize = 8192;

/// How much is pulled from the socket per receive.
pub const READSIZE: usize = 2048;

/// Buffer length above which [`BufferedConnection::compact`] discards
/// consumed bytes.
pub const COMPACT_THRESHOLD: usize = 10_000;

/// A region of the connection buffer, `[offset, offset + len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

pub struct BufferedConnection<S> {
    stream: S,
    buf: ByteBuffer,
    pos: usize,
    read_timeout: Option<Duration>,
}

impl<S> BufferedConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buf: ByteBuffer::with_capacity(BUFSIZE),
            pos: 0,
            read_timeout: None,
        }
    }

    /// Bounds every receive from the peer. An expired deadline surfaces as
    /// `io::ErrorKind::TimedOut`.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Bytes received but not consumed yet.
    pub fn buffered(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Total bytes held, consumed or not.
    pub fn buffer_len(&self) -> usize {
        self.buf.len()
    }

    /// Offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Receives up to `READSIZE` more bytes. Returns 0 at EOF.
    async fn read_more(&mut self) -> io::Result<usize> {
        let space = self.buf.reserve(READSIZE);
        let n = match self.read_timeout {
            Some(limit) => tokio::time::timeout(limit, self.stream.read(space))
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "read deadline expired"))??,
            None => self.stream.read(space).await?,
        };
        self.buf.commit(n);
        Ok(n)
    }

    /// Returns the next byte, or `None` at EOF.
    pub async fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if self.buffered() == 0 && self.read_more().await? == 0 {
            return Ok(None);
        }

        let byte = self.buf.as_slice()[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }

    /// Reads through the next `\n`.
    ///
    /// The returned span includes the terminator. If EOF arrives first the
    /// span covers whatever partial line was received, so an empty span
    /// means EOF with nothing left to read.
    pub async fn read_line(&mut self) -> io::Result<Span> {
        self.read_line_bounded(usize::MAX).await
    }

    /// Like [`read_line`](Self::read_line), but gives up once more than `max`
    /// bytes have been consumed without seeing `\n`.
    ///
    /// An over-long line therefore comes back as an unterminated span of
    /// `max + 1` bytes, and the peer cannot make the buffer grow without
    /// bound by never sending a newline.
    pub async fn read_line_bounded(&mut self, max: usize) -> io::Result<Span> {
        let start = self.pos;
        let cutoff = start.saturating_add(max).saturating_add(1);
        loop {
            // Scan what is already buffered before touching the socket.
            let limit = cutoff.min(self.buf.len());
            let unread = &self.buf.as_slice()[self.pos..limit];
            if let Some(i) = unread.iter().position(|&b| b == b'\n') {
                self.pos += i + 1;
                break;
            }
            self.pos = limit;

            if self.pos == cutoff || self.read_more().await? == 0 {
                break;
            }
        }
        Ok(Span::new(start, self.pos - start))
    }

    /// Reads `count` bytes, stopping early at EOF.
    ///
    /// A short span is not an error; callers must compare `span.len` with
    /// what they asked for.
    pub async fn read_exact(&mut self, count: usize) -> io::Result<Span> {
        let start = self.pos;
        while self.buffered() < count {
            if self.read_more().await? == 0 {
                break;
            }
        }

        let n = self.buffered().min(count);
        self.pos += n;
        Ok(Span::new(start, n))
    }

    /// Borrows the bytes of `span`, or `None` if it reaches past the end of
    /// the buffer.
    pub fn slice(&self, span: Span) -> Option<&[u8]> {
        self.buf.as_slice().get(span.offset..span.end())
    }

    /// Maps a view obtained from [`slice`](Self::slice) back to its offset.
    ///
    /// Returns `None` unless `sub` starts inside `[0, len)` of the current
    /// storage, which is what happens with a view taken before the buffer
    /// moved.
    pub fn offset_of(&self, sub: &[u8]) -> Option<usize> {
        let base = self.buf.as_slice().as_ptr() as usize;
        let addr = sub.as_ptr() as usize;
        let offset = addr.checked_sub(base)?;
        (offset < self.buf.len()).then_some(offset)
    }

    /// Writes the entire contents of `buf` to the peer.
    pub async fn send_buffer(&mut self, buf: &ByteBuffer) -> io::Result<usize> {
        self.stream.write_all(buf.as_slice()).await?;
        Ok(buf.len())
    }

    /// Streams `size` bytes of `file`, from its current position, to the peer.
    ///
    /// Returns the number of bytes transferred. Fewer than `size` means the
    /// file shrank underneath us.
    pub async fn send_file(&mut self, file: &mut File, size: u64) -> io::Result<u64> {
        let mut limited = file.take(size);
        let sent = tokio::io::copy(&mut limited, &mut self.stream).await?;
        self.stream.flush().await?;
        Ok(sent)
    }

    /// Discards consumed bytes once the buffer has grown past
    /// [`COMPACT_THRESHOLD`]. Invalidates every span handed out so far.
    pub fn compact(&mut self) {
        if self.buf.len() <= COMPACT_THRESHOLD {
            return;
        }

        let unread = self.buffered();
        if unread == 0 {
            self.buf.reset(BUFSIZE);
        } else {
            let mut fresh = ByteBuffer::with_capacity(BUFSIZE);
            fresh.append(&self.buf.as_slice()[self.pos..]);
            self.buf = fresh;
        }
        self.pos = 0;

        tracing::trace!(unread, "compacted connection buffer");
    }

    /// Shuts the write half down. The buffer goes away with `self`.
    pub async fn close(mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}
