pub mod create;
pub mod list;

use bytes::Bytes;
use http_body::Body;
use http_body_util::{BodyExt as _, LengthLimitError, Limited};

use crate::error::AppError;

/// Request bodies above this size are refused with 413.
pub const MAX_BODY_BYTES: usize = 100 * 1024;

pub async fn read_limited_body<B>(body: B) -> Result<Bytes, AppError>
where
    B: Body + Send,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.is::<LengthLimitError>() => Err(AppError::PayloadTooLarge(MAX_BODY_BYTES)),
        Err(err) => Err(AppError::Body(err)),
    }
}
