use core::fmt::{self, Display};
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier assigned by the store when a response is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestId(Uuid);

impl GuestId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// A day of the event month, always within `1..=31`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayOfMonth(u8);

impl DayOfMonth {
    pub const FIRST: u8 = 1;
    pub const LAST: u8 = 31;

    #[must_use]
    pub const fn new(day: u8) -> Option<Self> {
        if day >= Self::FIRST && day <= Self::LAST {
            Some(Self(day))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DayOfMonth {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            format!(
                "day {value} is outside {}..={}",
                Self::FIRST,
                Self::LAST
            )
        })
    }
}

impl From<DayOfMonth> for u8 {
    fn from(value: DayOfMonth) -> Self {
        value.0
    }
}

impl Display for DayOfMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "Après-midi")]
    Afternoon,
    #[serde(rename = "Soir")]
    Evening,
}

impl TimeSlot {
    pub const ALL: [Self; 2] = [Self::Afternoon, Self::Evening];

    /// The token used on the wire and in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Afternoon => "Après-midi",
            Self::Evening => "Soir",
        }
    }
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("`{0}` is not a valid time slot")]
pub struct UnknownTimeSlot(pub String);

impl FromStr for TimeSlot {
    type Err = UnknownTimeSlot;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.as_str() == value)
            .ok_or_else(|| UnknownTimeSlot(value.to_owned()))
    }
}

/// A candidate response before the store assigned an id and timestamps.
///
/// The client also uses this as its form draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuestSubmission {
    pub name: String,
    pub allergies_and_diet: String,
    pub needs_accommodation: bool,
    pub available_days: Vec<DayOfMonth>,
    pub available_time: Vec<TimeSlot>,
}

impl GuestSubmission {
    /// True when no field carries any information.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.allergies_and_diet.trim().is_empty()
            && !self.needs_accommodation
            && self.available_days.is_empty()
            && self.available_time.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestResponse {
    #[serde(alias = "_id")]
    pub id: GuestId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub allergies_and_diet: String,
    #[serde(default)]
    pub needs_accommodation: bool,
    #[serde(default)]
    pub available_days: Vec<DayOfMonth>,
    #[serde(default)]
    pub available_time: Vec<TimeSlot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GuestResponse {
    /// Stores a submission as created at `created_at`. Both timestamps start out equal.
    #[must_use]
    pub fn from_submission(
        id: GuestId,
        submission: GuestSubmission,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: submission.name,
            allergies_and_diet: submission.allergies_and_diet,
            needs_accommodation: submission.needs_accommodation,
            available_days: submission.available_days,
            available_time: submission.available_time,
            created_at,
            updated_at: created_at,
        }
    }

    #[must_use]
    pub fn submission(&self) -> GuestSubmission {
        GuestSubmission {
            name: self.name.clone(),
            allergies_and_diet: self.allergies_and_diet.clone(),
            needs_accommodation: self.needs_accommodation,
            available_days: self.available_days.clone(),
            available_time: self.available_time.clone(),
        }
    }
}
