//! Client session — bridges one TCP socket to the broadcast hub.
//!
//! DESIGN
//! ======
//! The session subscribes before touching the socket, so the snapshot it
//! replays and the live queue it drains line up exactly. The socket is then
//! split: a writer task delivers the replay followed by live events in FIFO
//! order, while the reader loop decodes inbound operations and publishes
//! them. Whichever side finishes first aborts the other, and the session
//! deregisters once. No handshake: replay starts immediately after accept
//! and the client may send at any time.
//!
//! ERROR HANDLING
//! ==============
//! Everything that goes wrong on a session is fatal to that session only:
//! errors are logged here and never propagate to the hub or acceptor. A
//! corrupted inbound stream is not resynchronized — with length-prefixed
//! framing there is no reliable way back to a frame boundary.

use std::net::SocketAddr;
use std::sync::Arc;

use shapes::{ShapeOp, WireError};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::hub::{BroadcastHub, Subscription};

/// Run one client session to completion. Never returns an error — session
/// failures terminate the session, not the relay.
pub async fn run_session(hub: Arc<BroadcastHub>, socket: TcpStream, addr: SocketAddr) {
    let Subscription { id, replay, rx } = hub.subscribe().await;
    info!(%addr, client_id = %id, "client connected");

    let (read_half, write_half) = socket.into_split();
    let mut reader = tokio::spawn(read_loop(Arc::clone(&hub), read_half, id));
    let mut writer = tokio::spawn(write_loop(write_half, replay, rx, id));

    // Either side ending ends the session; the other task is cancelled.
    tokio::select! {
        _ = &mut reader => writer.abort(),
        _ = &mut writer => reader.abort(),
    }

    hub.unsubscribe(id).await;
    info!(client_id = %id, "client disconnected");
}

/// Decode inbound operations until end-of-stream or a session-fatal error.
async fn read_loop(hub: Arc<BroadcastHub>, mut read_half: OwnedReadHalf, id: Uuid) {
    loop {
        match shapes::read_op(&mut read_half).await {
            Ok(op) => {
                info!(client_id = %id, kind = op.kind(), "recv op");
                hub.publish(op).await;
            }
            Err(WireError::Eof) => {
                info!(client_id = %id, "peer closed stream");
                break;
            }
            Err(e) => {
                warn!(client_id = %id, error = %e, "session read failed");
                break;
            }
        }
    }
}

/// Deliver the replay snapshot, then live events in enqueue order.
async fn write_loop(
    mut write_half: OwnedWriteHalf,
    replay: Vec<ShapeOp>,
    mut rx: mpsc::Receiver<ShapeOp>,
    id: Uuid,
) {
    for op in &replay {
        if let Err(e) = shapes::write_op(&mut write_half, op).await {
            warn!(client_id = %id, error = %e, "replay write failed");
            return;
        }
    }

    // `None` means the hub dropped this subscriber (overflow disconnect).
    while let Some(op) = rx.recv().await {
        if let Err(e) = shapes::write_op(&mut write_half, &op).await {
            warn!(client_id = %id, error = %e, "session write failed");
            return;
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
