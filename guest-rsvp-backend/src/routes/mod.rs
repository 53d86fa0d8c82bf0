pub mod guests;

use bytes::Bytes;
use http::{Method, Request, Response};
use http_body::Body;
use http_body_util::Full;
use tracing::{field, info_span, Instrument as _};

use crate::error::AppError;
use crate::response::{allow_any_origin, preflight_response};
use crate::AppState;

pub const GUESTS_PATH: &str = "/api/guests";

/// Entry point for every request, whatever connection it arrived on.
pub async fn handle<B>(request: Request<B>, state: AppState) -> Response<Full<Bytes>>
where
    B: Body + Send,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let span = info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        status = field::Empty,
    );
    async move {
        let response = match route(request, &state).await {
            Ok(response) => response,
            Err(app_error) => app_error.into_response(),
        };
        tracing::Span::current().record("status", response.status().as_u16());
        allow_any_origin(response)
    }
    .instrument(span)
    .await
}

async fn route<B>(request: Request<B>, state: &AppState) -> Result<Response<Full<Bytes>>, AppError>
where
    B: Body + Send,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = request.uri().path();
    if path != GUESTS_PATH && path.strip_suffix('/') != Some(GUESTS_PATH) {
        return Err(AppError::NotFound(path.to_owned()));
    }
    let method = request.method().clone();
    match method {
        Method::POST => guests::create::create(request, state.store()).await,
        Method::GET => guests::list::list(state.store()).await,
        Method::OPTIONS => Ok(preflight_response()),
        other => Err(AppError::MethodNotAllowed(other)),
    }
}
