//! Read-only statistics over every stored response.
//!
//! Everything is recomputed from the full list on each load; nothing is
//! cached between loads.

use std::collections::BTreeMap;

use guest_rsvp_model::{DayOfMonth, GuestResponse, TimeSlot};

/// The larger side of the accommodation split. A tie counts for
/// [`AccommodationMajority::NotNeeded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccommodationMajority {
    Needed,
    NotNeeded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccommodationCounts {
    pub needed: usize,
    pub not_needed: usize,
}

impl AccommodationCounts {
    #[must_use]
    pub const fn majority(&self) -> AccommodationMajority {
        if self.needed > self.not_needed {
            AccommodationMajority::Needed
        } else {
            AccommodationMajority::NotNeeded
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DietNote {
    /// Position among the non-blank notes, starting at 0.
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub accommodation: AccommodationCounts,
    /// Ascending by day.
    pub day_counts: Vec<(DayOfMonth, usize)>,
    /// In the order the slots first appear in the data.
    pub time_counts: Vec<(TimeSlot, usize)>,
    pub diet_notes: Vec<DietNote>,
    /// Every day reaching [`DashboardStats::best_day_count`], ascending.
    pub best_days: Vec<DayOfMonth>,
    pub best_day_count: usize,
}

impl DashboardStats {
    #[must_use]
    pub fn compute(guests: &[GuestResponse]) -> Self {
        let mut accommodation = AccommodationCounts::default();
        let mut days = BTreeMap::<DayOfMonth, usize>::new();
        let mut time_counts = Vec::<(TimeSlot, usize)>::new();
        let mut diet_notes = Vec::new();

        for guest in guests {
            if guest.needs_accommodation {
                accommodation.needed += 1;
            } else {
                accommodation.not_needed += 1;
            }

            for day in &guest.available_days {
                *days.entry(*day).or_default() += 1;
            }

            for slot in &guest.available_time {
                match time_counts.iter_mut().find(|(seen, _)| seen == slot) {
                    Some((_, count)) => *count += 1,
                    None => time_counts.push((*slot, 1)),
                }
            }

            if !guest.allergies_and_diet.trim().is_empty() {
                diet_notes.push(DietNote {
                    index: diet_notes.len(),
                    text: guest.allergies_and_diet.clone(),
                });
            }
        }

        let best_day_count = days.values().copied().max().unwrap_or(0);
        let best_days = days
            .iter()
            .filter(|(_, count)| **count == best_day_count)
            .map(|(day, _)| *day)
            .collect();

        Self {
            total: guests.len(),
            accommodation,
            day_counts: days.into_iter().collect(),
            time_counts,
            diet_notes,
            best_days,
            best_day_count,
        }
    }
}
