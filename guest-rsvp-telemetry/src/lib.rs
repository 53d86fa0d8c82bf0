use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const DEFAULT_LOG_LEVEL: &str = "info,guest_rsvp=debug,hyper=info,h2=info,diesel_async=info";

/// Installs the global subscriber: human readable events on stderr, filtered by
/// `RUST_LOG` or [`DEFAULT_LOG_LEVEL`].
///
/// Calling it twice is harmless, the second installation is skipped.
pub fn setup_telemetry() {
    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    if tracing_subscriber::registry()
        .with(stderr_log.with_filter(filter))
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber was already installed");
    }
}
