pub mod error;
pub mod response;
pub mod routes;

use core::convert::Infallible;
use std::future::Future;
use std::net::{Ipv4Addr, SocketAddrV4};

use error::AppError;
use futures_util::pin_mut;
use guest_rsvp_config::ServerConfig;
use guest_rsvp_database::{connect, SharedGuestStore};
use hyper::body::Incoming;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo};
use tokio::net::TcpListener;
use tokio::select;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

#[derive(Clone)]
pub struct AppState {
    store: SharedGuestStore,
}

impl AppState {
    #[must_use]
    pub fn new(store: SharedGuestStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &SharedGuestStore {
        &self.store
    }
}

pub async fn setup_server(database_url: &str) -> Result<AppState, AppError> {
    info!("starting up server...");
    let store = connect(database_url).await?;
    Ok(AppState::new(store))
}

/// Connects to storage and binds the listener. The returned future serves
/// requests until SIGINT or SIGTERM arrives.
pub async fn run_server(
    config: ServerConfig,
) -> Result<impl Future<Output = Result<(), AppError>>, AppError> {
    let state = setup_server(&config.database_url).await?;

    let listener =
        TcpListener::bind(SocketAddrV4::new(Ipv4Addr::new(0, 0, 0, 0), config.port)).await?;
    info!("listening on {}", listener.local_addr()?);

    Ok(serve(listener, state, shutdown_signal()))
}

/// Accept loop. Each connection runs on its own task; once `shutdown`
/// resolves, open connections are asked to finish gracefully and the future
/// completes after all of them closed.
#[allow(clippy::redundant_pub_crate)]
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()>,
) -> Result<(), AppError> {
    // tell the connections to shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(());

    // wait for the connections to finish shutdown
    let (closed_tx, closed_rx) = watch::channel(());

    pin_mut!(shutdown);

    loop {
        select! {
            accept = listener.accept() => {
                let (socket, remote_addr) = match accept {
                    Ok(accepted) => accepted,
                    Err(err) => {
                        warn!("failed to accept connection: {err}");
                        continue;
                    }
                };
                debug!(%remote_addr, "accepted connection");

                let state = state.clone();
                let mut shutdown_rx = shutdown_rx.clone();
                let closed_rx = closed_rx.clone();

                tokio::spawn(async move {
                    let socket = TokioIo::new(socket);

                    let hyper_service = hyper::service::service_fn(move |request: Request<Incoming>| {
                        let state = state.clone();
                        async move { Ok::<_, Infallible>(routes::handle(request, state).await) }
                    });

                    let builder = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new());
                    let connection = builder.serve_connection_with_upgrades(socket, hyper_service);
                    pin_mut!(connection);

                    select! {
                        connection_result = connection.as_mut() => {
                            if let Err(err) = connection_result {
                                error!("failed to serve connection: {err:#}");
                            }
                        }
                        _ = shutdown_rx.changed() => {
                            connection.as_mut().graceful_shutdown();
                            // idle connections end with a cancellation here
                            if let Err(err) = connection.as_mut().await {
                                debug!("connection ended during shutdown: {err:#}");
                            }
                        }
                    }

                    debug!(%remote_addr, "closed connection");
                    drop(closed_rx);
                });
            }
            () = &mut shutdown => {
                warn!("shutting down, waiting for open connections");
                drop(shutdown_rx);
                if shutdown_tx.send(()).is_err() {
                    debug!("no open connections");
                }
                drop(closed_rx);
                closed_tx.closed().await;
                break;
            }
        }
    }

    info!("server stopped");
    Ok(())
}

#[allow(clippy::redundant_pub_crate)]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("failed to install signal handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use guest_rsvp_database::MemoryGuestStore;
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    // current thread runtime, so every connection task logs into the scoped subscriber
    #[tokio::test]
    async fn idle_connections_close_quietly_on_shutdown() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = AppState::new(Arc::new(MemoryGuestStore::default()));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, state, async move {
            shutdown_rx.await.unwrap();
        }));

        let idle = TcpStream::connect(addr).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        shutdown_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        drop(idle);

        let logs = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("accepted connection"), "{logs}");
        assert!(logs.contains("server stopped"), "{logs}");
        assert!(!logs.contains("ERROR"), "{logs}");
    }
}
