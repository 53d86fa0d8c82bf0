pub mod api;
pub mod calendar;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod gesture;
pub mod responses;
pub mod settings;

pub use api::{GuestApi, HttpGuestApi};
pub use error::ClientError;
