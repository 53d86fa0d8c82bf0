use chrono::{Datelike as _, Months, NaiveDate};
use guest_rsvp_model::DayOfMonth;

pub const WEEKDAY_SHORT_NAMES: [&str; 7] = ["Lun", "Mar", "Mer", "Jeu", "Ven", "Sam", "Dim"];

const MONTH_NAMES: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell {
    /// Padding before the first day so weeks start on Monday.
    Blank,
    Day {
        day: DayOfMonth,
        weekday: &'static str,
        weekend: bool,
    },
}

/// The month the guests pick their days in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMonth {
    first: NaiveDate,
    days: u8,
}

impl EventMonth {
    /// `month` is 1-based. `None` for a date chrono cannot represent.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = first.checked_add_months(Months::new(1))?;
        let days = u8::try_from(next.signed_duration_since(first).num_days()).ok()?;
        Some(Self { first, days })
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.first.year()
    }

    #[must_use]
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.first.month0() as usize]
    }

    #[must_use]
    pub const fn days(&self) -> u8 {
        self.days
    }

    #[must_use]
    pub const fn contains(&self, day: DayOfMonth) -> bool {
        day.get() <= self.days
    }

    /// Weekday of the first day, Monday being 0.
    #[must_use]
    pub fn leading_blanks(&self) -> usize {
        self.first.weekday().num_days_from_monday() as usize
    }

    fn weekday_index(&self, day: DayOfMonth) -> usize {
        (self.leading_blanks() + usize::from(day.get()) - 1) % 7
    }

    #[must_use]
    pub fn weekday_name(&self, day: DayOfMonth) -> &'static str {
        WEEKDAY_SHORT_NAMES[self.weekday_index(day)]
    }

    #[must_use]
    pub fn is_weekend(&self, day: DayOfMonth) -> bool {
        self.weekday_index(day) >= 5
    }

    /// `Sam 1 août`
    #[must_use]
    pub fn day_label(&self, day: DayOfMonth) -> String {
        format!("{} {} {}", self.weekday_name(day), day, self.month_name())
    }

    #[must_use]
    pub fn cells(&self) -> Vec<CalendarCell> {
        let blanks = std::iter::repeat(CalendarCell::Blank).take(self.leading_blanks());
        let days = (1..=self.days).filter_map(DayOfMonth::new).map(|day| CalendarCell::Day {
            day,
            weekday: self.weekday_name(day),
            weekend: self.is_weekend(day),
        });
        blanks.chain(days).collect()
    }
}
