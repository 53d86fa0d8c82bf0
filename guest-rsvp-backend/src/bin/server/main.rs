use guest_rsvp_backend::error::AppError;
use guest_rsvp_backend::run_server;
use guest_rsvp_config::get_server_config;
use guest_rsvp_telemetry::setup_telemetry;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // avoid putting more code here as this is outside of all spans
    setup_telemetry();

    let config = get_server_config()?;
    run_server(config).await?.await
}
