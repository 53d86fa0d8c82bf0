use bytes::Bytes;
use headers::{
    AccessControlAllowHeaders, AccessControlAllowMethods, AccessControlAllowOrigin, ContentType,
    Header, HeaderMapExt as _,
};
use http::header::CONTENT_TYPE;
use http::{Method, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

use crate::error::AppError;

pub trait ResponseTypedHeaderExt {
    #[must_use]
    fn typed_header(self, header: impl Header) -> Self;
}

impl<B> ResponseTypedHeaderExt for Response<B> {
    fn typed_header(mut self, header: impl Header) -> Self {
        self.headers_mut().typed_insert(header);
        self
    }
}

pub fn json_bytes_response(status: StatusCode, bytes: Vec<u8>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(bytes)));
    *response.status_mut() = status;
    response.typed_header(ContentType::json())
}

pub fn json_response(
    status: StatusCode,
    value: &impl Serialize,
) -> Result<Response<Full<Bytes>>, AppError> {
    let bytes = serde_json::to_vec(value).map_err(AppError::Encode)?;
    Ok(json_bytes_response(status, bytes))
}

pub fn empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

/// Any origin may call the API.
pub fn allow_any_origin<B>(response: Response<B>) -> Response<B> {
    response.typed_header(AccessControlAllowOrigin::ANY)
}

pub fn preflight_response() -> Response<Full<Bytes>> {
    empty_response(StatusCode::NO_CONTENT)
        .typed_header(
            [Method::GET, Method::POST, Method::OPTIONS]
                .into_iter()
                .collect::<AccessControlAllowMethods>(),
        )
        .typed_header(
            [CONTENT_TYPE]
                .into_iter()
                .collect::<AccessControlAllowHeaders>(),
        )
}
