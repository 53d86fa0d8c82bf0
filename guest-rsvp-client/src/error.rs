use http::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Hyper(#[from] hyper::Error),
    #[error("failed to build request: {0}")]
    Request(#[from] http::Error),
    #[error("invalid API URL: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),
    #[error("API URL {0} has no host")]
    MissingHost(String),
    #[error("unsupported scheme in API URL {0}, expected http or https")]
    UnsupportedScheme(String),
    #[error("`{0}` is not a valid TLS server name")]
    ServerName(String),
    #[error("server answered {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write settings to {path}: {source}")]
    Settings {
        path: String,
        source: std::io::Error,
    },
}
