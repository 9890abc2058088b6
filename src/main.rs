mod acceptor;
mod history;
mod hub;
mod session;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| shapes::DEFAULT_PORT.to_string())
        .parse()
        .expect("invalid PORT");
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".into());

    let hub = Arc::new(hub::BroadcastHub::new());

    let listener = tokio::net::TcpListener::bind(format!("{bind_addr}:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "sketchrelay listening");
    if let Err(e) = acceptor::run(listener, hub).await {
        tracing::error!(error = %e, "listener failed");
        std::process::exit(1);
    }
}
