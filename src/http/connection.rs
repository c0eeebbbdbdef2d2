use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::http::bufio::BufferedConnection;
use crate::http::transaction::{TransactionError, handle_transaction};
use crate::server::ServerContext;

/// Drives the transactions of one client connection, strictly one after
/// another.
pub struct Connection<S> {
    conn: BufferedConnection<S>,
    ctx: Arc<ServerContext>,
    state: ConnectionState,
    served: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Parsing a request and answering it.
    Transacting,
    /// Between requests on a kept-alive connection.
    Idle,
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, ctx: Arc<ServerContext>) -> Self {
        let conn = BufferedConnection::new(stream).with_read_timeout(ctx.read_timeout);
        Self {
            conn,
            ctx,
            state: ConnectionState::Transacting,
            served: 0,
        }
    }

    /// Serves requests until the client closes, asks to close, or a request
    /// fails. Returns how many requests were answered.
    ///
    /// A clean EOF between requests is not an error.
    pub async fn run(mut self) -> Result<usize, TransactionError> {
        let result = loop {
            match self.state {
                ConnectionState::Transacting => {
                    match handle_transaction(&mut self.conn, &self.ctx).await {
                        Ok(outcome) => {
                            self.served += 1;
                            self.state = if outcome.keep_alive {
                                ConnectionState::Idle
                            } else {
                                ConnectionState::Closed
                            };
                        }
                        Err(e) if e.is_eof() => {
                            self.state = ConnectionState::Closed;
                        }
                        Err(e) => break Err(e),
                    }
                }

                ConnectionState::Idle => {
                    // Spans from the finished request are dead now.
                    self.conn.compact();
                    self.state = ConnectionState::Transacting;
                }

                ConnectionState::Closed => break Ok(self.served),
            }
        };

        if let Err(e) = self.conn.close().await {
            tracing::trace!(error = %e, "shutdown after close failed");
        }
        result
    }
}
