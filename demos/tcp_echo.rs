//! Pools connections to a local echo server.
//!
//! Starts an echo server on a random port, builds a pool against it and
//! runs a handful of concurrent clients through the pool.
//!
//! Run with: cargo run --example tcp_echo -- [--debug]

// ============================================================================
// Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use netpool::{ConnectionPool, Result, TcpFactory};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

const CLIENTS: usize = 8;
const MAX_IDLE: usize = 2;
const MAX_OPEN: usize = 4;

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing/logging.
fn init_logging(debug: bool) {
    let filter = if debug { "netpool=debug" } else { "netpool=info" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

async fn spawn_echo_server() -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                while let Ok(n) = AsyncReadExt::read(&mut stream, &mut buf).await {
                    if n == 0 || stream.write_all(&buf[..n]).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    Ok(addr)
}

async fn run_client(pool: Arc<ConnectionPool<TcpStream>>, client: usize) -> Result<()> {
    let mut conn = pool.acquire_with_timeout(Duration::from_secs(5)).await?;

    let message = format!("hello from client {client}");
    conn.write_all(message.as_bytes()).await?;

    let mut reply = vec![0u8; message.len()];
    conn.read_exact(&mut reply).await?;
    info!(client, reply = %String::from_utf8_lossy(&reply), "Echo received");

    pool.release(conn).await
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let debug = std::env::args().any(|a| a == "--debug");
    init_logging(debug);

    let addr = spawn_echo_server().await?;
    let factory = TcpFactory::new(addr)
        .with_connect_timeout(Duration::from_secs(2))
        .with_nodelay(true);

    let pool = ConnectionPool::new(MAX_IDLE, MAX_OPEN, factory).await?;

    let clients: Vec<_> = (0..CLIENTS)
        .map(|client| tokio::spawn(run_client(Arc::clone(&pool), client)))
        .collect();

    for handle in clients {
        if let Ok(Err(e)) = handle.await {
            tracing::warn!(error = %e, "Client failed");
        }
    }

    info!(idle = pool.len(), open = pool.open_count(), "Clients done");

    pool.shutdown().await
}
