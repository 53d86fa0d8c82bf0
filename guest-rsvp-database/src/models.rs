use chrono::{DateTime, Utc};
use diesel::prelude::*;
use guest_rsvp_model::{DayOfMonth, GuestId, GuestResponse, GuestSubmission, TimeSlot};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::schema::guests;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = guests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GuestRow {
    pub id: Uuid,
    pub seq: i64,
    pub name: String,
    pub allergies_and_diet: String,
    pub needs_accommodation: bool,
    pub available_days: Vec<i32>,
    pub available_time: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Id, sequence and timestamps are left to column defaults.
#[derive(Insertable, Debug)]
#[diesel(table_name = guests)]
pub struct NewGuestRow {
    pub name: String,
    pub allergies_and_diet: String,
    pub needs_accommodation: bool,
    pub available_days: Vec<i32>,
    pub available_time: Vec<String>,
}

impl From<GuestSubmission> for NewGuestRow {
    fn from(submission: GuestSubmission) -> Self {
        Self {
            name: submission.name,
            allergies_and_diet: submission.allergies_and_diet,
            needs_accommodation: submission.needs_accommodation,
            available_days: submission
                .available_days
                .into_iter()
                .map(|day| i32::from(day.get()))
                .collect(),
            available_time: submission
                .available_time
                .into_iter()
                .map(|slot| slot.as_str().to_owned())
                .collect(),
        }
    }
}

impl TryFrom<GuestRow> for GuestResponse {
    type Error = DatabaseError;

    fn try_from(row: GuestRow) -> Result<Self, Self::Error> {
        let available_days = row
            .available_days
            .iter()
            .map(|day| {
                u8::try_from(*day)
                    .ok()
                    .and_then(DayOfMonth::new)
                    .ok_or_else(|| DatabaseError::CorruptRow(row.id, format!("day {day}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let available_time = row
            .available_time
            .iter()
            .map(|slot| {
                slot.parse::<TimeSlot>()
                    .map_err(|error| DatabaseError::CorruptRow(row.id, error.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            id: GuestId::from_uuid(row.id),
            name: row.name,
            allergies_and_diet: row.allergies_and_diet,
            needs_accommodation: row.needs_accommodation,
            available_days,
            available_time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
