use bytes::Bytes;
use guest_rsvp_database::SharedGuestStore;
use guest_rsvp_model::validate_submission;
use http::{Request, Response, StatusCode};
use http_body::Body;
use http_body_util::Full;
use serde_json::Value;
use tracing::info;

use super::read_limited_body;
use crate::error::AppError;
use crate::response::json_response;

pub async fn create<B>(
    request: Request<B>,
    store: &SharedGuestStore,
) -> Result<Response<Full<Bytes>>, AppError>
where
    B: Body + Send,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let body = read_limited_body(request.into_body()).await?;
    // a missing body counts as an empty object
    let payload: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_slice(&body)?
    };

    let submission = validate_submission(&payload)?;
    let guest = store.insert(submission).await?;
    info!(id = %guest.id, "stored guest response");

    json_response(StatusCode::CREATED, &guest)
}
