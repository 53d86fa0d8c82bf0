pub mod guest;
pub mod validation;

pub use guest::{DayOfMonth, GuestId, GuestResponse, GuestSubmission, TimeSlot, UnknownTimeSlot};
pub use validation::{validate_submission, FieldError, ValidationErrors};
