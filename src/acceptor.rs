//! Connection acceptor — binds the relay port and spawns a session per client.
//!
//! DESIGN
//! ======
//! The accept loop never blocks on a client's traffic: each accepted socket
//! is handed to a spawned session task immediately. Per-connection accept
//! errors are logged and the loop continues; anything else means the
//! listener itself has failed and is returned to `main`, which exits.

use std::io;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::warn;

use crate::hub::BroadcastHub;
use crate::session;

/// Accept connections until the listener fails.
///
/// # Errors
///
/// Returns the underlying I/O error when the listening socket itself fails;
/// transient per-connection errors never surface here.
pub async fn run(listener: TcpListener, hub: Arc<BroadcastHub>) -> io::Result<()> {
    loop {
        match listener.accept().await {
            Ok((socket, addr)) => {
                if let Err(e) = socket.set_nodelay(true) {
                    warn!(%addr, error = %e, "set_nodelay failed");
                }
                let hub = Arc::clone(&hub);
                tokio::spawn(async move {
                    session::run_session(hub, socket, addr).await;
                });
            }
            Err(e) if is_transient(&e) => {
                warn!(error = %e, "transient accept failure");
            }
            Err(e) => return Err(e),
        }
    }
}

/// Accept errors attributable to one connection rather than the listener.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionAborted | io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionRefused
    )
}

#[cfg(test)]
#[path = "acceptor_test.rs"]
mod tests;
