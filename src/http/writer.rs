use std::io;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::buffer::ByteBuffer;
use crate::http::bufio::BufferedConnection;
use crate::http::response::{Response, StatusCode};

const HTTP_VERSION: &str = "HTTP/1.1";

/// `HTTP/1.1 <code> <reason>\r\n`, whatever version the client spoke.
pub fn status_line(status: StatusCode) -> ByteBuffer {
    let line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        status.as_u16(),
        status.reason_phrase()
    );
    let mut buf = ByteBuffer::with_capacity(line.len());
    buf.append_str(&line);
    buf
}

/// Sends the status line, the accumulated headers and the blank line that
/// ends them. The body is the caller's business.
pub async fn send_head<S>(conn: &mut BufferedConnection<S>, resp: &mut Response) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    conn.send_buffer(&status_line(resp.status)).await?;
    resp.headers.append_str("\r\n");
    conn.send_buffer(&resp.headers).await?;
    Ok(())
}

/// Sends a complete response whose body is in `resp.body`.
///
/// `Content-Length` is computed here; all other headers must already be set.
pub async fn send_response<S>(conn: &mut BufferedConnection<S>, resp: &mut Response) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let length = resp.body.len();
    resp.add_header("Content-Length", length);
    send_head(conn, resp).await?;
    conn.send_buffer(&resp.body).await?;
    Ok(())
}
