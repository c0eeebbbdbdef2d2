use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::server::ServerContext;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let ctx = Arc::new(ServerContext::from_config(cfg)?);
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!("Listening on {}, serving {}", cfg.server.listen_addr, ctx.root.display());

    serve(listener, ctx).await
}

/// Pause after a failed `accept`.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Accept loop. Each client gets its own task. A failed `accept` is logged
/// and the loop carries on.
pub async fn serve(listener: TcpListener, ctx: Arc<ServerContext>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        debug!("Accepted connection from {}", peer);

        if let Err(e) = socket.set_nodelay(true) {
            warn!("Could not set TCP_NODELAY for {}: {}", peer, e);
        }

        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            match Connection::new(socket, ctx).run().await {
                Ok(served) => debug!(%peer, served, "Connection closed"),
                Err(e) => warn!("Connection error from {}: {}", peer, e),
            }
        });
    }
}
