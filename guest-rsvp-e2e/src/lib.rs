use std::net::{Ipv4Addr, SocketAddr};

use guest_rsvp_backend::error::AppError;
use guest_rsvp_backend::{serve, setup_server};
use guest_rsvp_telemetry::setup_telemetry;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// A server on an ephemeral localhost port, backed by a fresh in-memory store.
pub struct TestServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<std::result::Result<(), AppError>>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        setup_telemetry();

        let state = setup_server("memory://").await?;
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        info!(%addr, "test server listening");

        let (shutdown, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(listener, state, async move {
            if shutdown_rx.await.is_err() {
                info!("test server handle dropped");
            }
        }));

        Ok(Self {
            addr,
            shutdown,
            handle,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stops accepting, waits for open connections and returns the server's result.
    pub async fn stop(self) -> Result<()> {
        if self.shutdown.send(()).is_err() {
            info!("test server already stopped");
        }
        self.handle.await??;
        Ok(())
    }
}
