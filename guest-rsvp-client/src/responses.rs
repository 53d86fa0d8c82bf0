use core::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};
use guest_rsvp_model::{GuestResponse, TimeSlot};

use crate::calendar::EventMonth;

/// One stored response prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCard {
    /// The newest response carries the highest number.
    pub number: usize,
    pub created_at: String,
    pub name: Option<String>,
    pub allergies_and_diet: Option<String>,
    pub accommodation: &'static str,
    pub days: Vec<String>,
    pub times: Vec<TimeSlot>,
}

#[must_use]
pub const fn accommodation_text(needs_accommodation: bool) -> &'static str {
    if needs_accommodation {
        "Oui, besoin d'un hébergement"
    } else {
        "Non"
    }
}

/// `dd/mm/yyyy HH:MM` in `tz`.
pub fn format_timestamp<Tz>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp
        .with_timezone(tz)
        .format("%d/%m/%Y %H:%M")
        .to_string()
}

fn non_blank(text: &str) -> Option<String> {
    (!text.trim().is_empty()).then(|| text.to_owned())
}

/// `guests` must be newest first, as the storage API returns them.
pub fn response_cards<Tz>(guests: &[GuestResponse], month: &EventMonth, tz: &Tz) -> Vec<ResponseCard>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    guests
        .iter()
        .enumerate()
        .map(|(index, guest)| {
            let mut days = guest.available_days.clone();
            days.sort_unstable();
            ResponseCard {
                number: guests.len() - index,
                created_at: format_timestamp(&guest.created_at, tz),
                name: non_blank(&guest.name),
                allergies_and_diet: non_blank(&guest.allergies_and_diet),
                accommodation: accommodation_text(guest.needs_accommodation),
                days: days.into_iter().map(|day| month.day_label(day)).collect(),
                times: guest.available_time.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use guest_rsvp_model::{DayOfMonth, GuestId, GuestSubmission};

    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn timestamps_follow_the_given_zone() {
        let timestamp = at("2026-07-31T22:30:00Z");
        assert_eq!(format_timestamp(&timestamp, &Utc), "31/07/2026 22:30");
        let paris_summer = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(format_timestamp(&timestamp, &paris_summer), "01/08/2026 00:30");
    }

    #[test]
    fn cards_are_numbered_from_the_newest() {
        let month = EventMonth::new(2026, 8).unwrap();
        let newest = GuestResponse::from_submission(
            GuestId::generate(),
            GuestSubmission {
                name: "Jeanne".to_owned(),
                allergies_and_diet: " ".to_owned(),
                needs_accommodation: true,
                available_days: vec![DayOfMonth::new(3).unwrap(), DayOfMonth::new(1).unwrap()],
                available_time: vec![TimeSlot::Evening],
            },
            at("2026-05-02T10:05:00Z"),
        );
        let oldest = GuestResponse::from_submission(
            GuestId::generate(),
            GuestSubmission::default(),
            at("2026-05-01T09:00:00Z"),
        );

        let cards = response_cards(&[newest, oldest], &month, &Utc);
        assert_eq!(cards.len(), 2);

        assert_eq!(cards[0].number, 2);
        assert_eq!(cards[0].created_at, "02/05/2026 10:05");
        assert_eq!(cards[0].name.as_deref(), Some("Jeanne"));
        assert_eq!(cards[0].allergies_and_diet, None);
        assert_eq!(cards[0].accommodation, "Oui, besoin d'un hébergement");
        assert_eq!(cards[0].days, vec!["Sam 1 août", "Lun 3 août"]);
        assert_eq!(cards[0].times, vec![TimeSlot::Evening]);

        assert_eq!(cards[1].number, 1);
        assert_eq!(cards[1].name, None);
        assert_eq!(cards[1].accommodation, "Non");
        assert!(cards[1].days.is_empty());
    }
}
