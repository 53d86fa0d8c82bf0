use bytes::Bytes;
use guest_rsvp_database::SharedGuestStore;
use http::{Response, StatusCode};
use http_body_util::Full;
use tracing::debug;

use crate::error::AppError;
use crate::response::json_response;

/// Every stored response, newest first.
pub async fn list(store: &SharedGuestStore) -> Result<Response<Full<Bytes>>, AppError> {
    let guests = store.list_newest_first().await?;
    debug!(count = guests.len(), "listing guest responses");
    json_response(StatusCode::OK, &guests)
}
