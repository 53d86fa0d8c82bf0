use guest_rsvp_model::{DayOfMonth, GuestSubmission, TimeSlot};
use tracing::{info, warn};

use crate::api::GuestApi;

/// One user edit of the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    Name(String),
    AllergiesAndDiet(String),
    NeedsAccommodation(bool),
    ToggleDay(DayOfMonth),
    ToggleTime(TimeSlot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Success,
    Error,
    EmptySubmission,
}

impl FormStatus {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Success => "Merci ! Votre réponse a bien été enregistrée.",
            Self::Error => "Une erreur est survenue, veuillez réessayer.",
            Self::EmptySubmission => "Veuillez remplir au moins un champ avant d'envoyer.",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    draft: GuestSubmission,
    status: Option<FormStatus>,
}

impl SubmissionForm {
    #[must_use]
    pub const fn draft(&self) -> &GuestSubmission {
        &self.draft
    }

    #[must_use]
    pub const fn status(&self) -> Option<FormStatus> {
        self.status
    }

    pub fn apply(&mut self, edit: FormEdit) {
        let draft = &mut self.draft;
        match edit {
            FormEdit::Name(name) => draft.name = name,
            FormEdit::AllergiesAndDiet(text) => draft.allergies_and_diet = text,
            FormEdit::NeedsAccommodation(flag) => draft.needs_accommodation = flag,
            FormEdit::ToggleDay(day) => match draft.available_days.binary_search(&day) {
                Ok(position) => {
                    draft.available_days.remove(position);
                }
                Err(position) => draft.available_days.insert(position, day),
            },
            FormEdit::ToggleTime(slot) => {
                if let Some(position) = draft.available_time.iter().position(|s| *s == slot) {
                    draft.available_time.remove(position);
                } else {
                    draft.available_time.push(slot);
                }
            }
        }
    }

    /// Sends the draft. A blank draft is refused locally; on success the draft
    /// is reset, on failure it is kept for another attempt.
    pub async fn submit(&mut self, api: &dyn GuestApi) -> FormStatus {
        self.status = None;

        let status = if self.draft.is_blank() {
            FormStatus::EmptySubmission
        } else {
            match api.create(&self.draft).await {
                Ok(guest) => {
                    info!(id = %guest.id, "response submitted");
                    self.draft = GuestSubmission::default();
                    FormStatus::Success
                }
                Err(err) => {
                    warn!("submitting response failed: {err}");
                    FormStatus::Error
                }
            }
        };
        self.status = Some(status);
        status
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use guest_rsvp_model::{GuestId, GuestResponse};
    use http::StatusCode;

    use super::*;
    use crate::error::ClientError;

    #[derive(Default)]
    struct RecordingApi {
        fail: bool,
        calls: AtomicUsize,
        sent: Mutex<Vec<GuestSubmission>>,
    }

    #[async_trait]
    impl GuestApi for RecordingApi {
        async fn create(&self, submission: &GuestSubmission) -> Result<GuestResponse, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ClientError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "storage unavailable".to_owned(),
                });
            }
            self.sent.lock().unwrap().push(submission.clone());
            Ok(GuestResponse::from_submission(
                GuestId::generate(),
                submission.clone(),
                Utc::now(),
            ))
        }

        async fn list(&self) -> Result<Vec<GuestResponse>, ClientError> {
            Ok(Vec::new())
        }
    }

    fn day(value: u8) -> DayOfMonth {
        DayOfMonth::new(value).unwrap()
    }

    #[test]
    fn toggling_days_keeps_them_sorted() {
        let mut form = SubmissionForm::default();
        for value in [15, 3, 22] {
            form.apply(FormEdit::ToggleDay(day(value)));
        }
        assert_eq!(form.draft().available_days, vec![day(3), day(15), day(22)]);

        form.apply(FormEdit::ToggleDay(day(15)));
        assert_eq!(form.draft().available_days, vec![day(3), day(22)]);
    }

    #[test]
    fn toggling_times_adds_then_removes() {
        let mut form = SubmissionForm::default();
        form.apply(FormEdit::ToggleTime(TimeSlot::Evening));
        form.apply(FormEdit::ToggleTime(TimeSlot::Afternoon));
        assert_eq!(
            form.draft().available_time,
            vec![TimeSlot::Evening, TimeSlot::Afternoon]
        );
        form.apply(FormEdit::ToggleTime(TimeSlot::Evening));
        assert_eq!(form.draft().available_time, vec![TimeSlot::Afternoon]);
    }

    #[tokio::test]
    async fn blank_draft_makes_no_call() {
        let api = RecordingApi::default();
        let mut form = SubmissionForm::default();
        form.apply(FormEdit::Name("   ".to_owned()));

        assert_eq!(form.submit(&api).await, FormStatus::EmptySubmission);
        assert_eq!(form.status(), Some(FormStatus::EmptySubmission));
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn accommodation_alone_is_enough() {
        let api = RecordingApi::default();
        let mut form = SubmissionForm::default();
        form.apply(FormEdit::NeedsAccommodation(true));

        assert_eq!(form.submit(&api).await, FormStatus::Success);
        assert_eq!(
            api.sent.lock().unwrap().as_slice(),
            [GuestSubmission {
                needs_accommodation: true,
                ..GuestSubmission::default()
            }]
        );
        assert_eq!(form.draft(), &GuestSubmission::default());
    }

    #[tokio::test]
    async fn failed_submit_keeps_the_draft() {
        let api = RecordingApi {
            fail: true,
            ..RecordingApi::default()
        };
        let mut form = SubmissionForm::default();
        form.apply(FormEdit::Name("Jeanne".to_owned()));
        form.apply(FormEdit::ToggleDay(day(8)));
        let before = form.draft().clone();

        assert_eq!(form.submit(&api).await, FormStatus::Error);
        assert_eq!(form.draft(), &before);
        assert_eq!(form.status(), Some(FormStatus::Error));
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }
}
