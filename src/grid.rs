//! Month-grid generation for the calendar view

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

use crate::date_key::DateKey;
use crate::errors::{Error, Result};
use crate::reminder::Reminder;
use crate::store::ReminderStore;

/// Column headers of the grid. Weeks run Sunday through Saturday.
pub const WEEKDAY_LABELS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// One day of the rendered grid
#[derive(Clone, Debug, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// Day of month, 1-based
    pub day: u32,
    pub is_today: bool,
    /// Saturday or Sunday
    pub is_weekend: bool,
    /// Whether this day belongs to the reference month (the grid also shows
    /// spill-over days of the adjacent months)
    pub in_month: bool,
    /// The reminders scheduled on this day, in time order
    pub reminders: Vec<Reminder>,
}

/// Produces the day-cells to render for a reference month.
///
/// The output is fully determined by the reference month, the injected
/// `today` and the store contents.
pub struct GridBuilder<'a> {
    store: &'a ReminderStore,
    today: NaiveDate,
}

impl<'a> GridBuilder<'a> {
    /// A builder using the local calendar day as "today"
    pub fn new(store: &'a ReminderStore) -> Self {
        Self::with_today(store, Local::now().date_naive())
    }

    /// A builder with an explicit "today"
    pub fn with_today(store: &'a ReminderStore, today: NaiveDate) -> Self {
        Self { store, today }
    }

    /// Build the grid for the given month.
    ///
    /// The grid starts at the Sunday of the week containing the 1st and ends
    /// at the Saturday of the week containing the month's last day, so it
    /// always consists of complete weeks (the cell count is a multiple of 7).
    pub fn build(&self, year: i32, month: u32) -> Result<Vec<DayCell>> {
        let month_start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| Error::Validation {
            field: "month",
            message: format!("{}-{} is not a calendar month", year, month),
        })?;
        let month_end = end_of_month(month_start);

        let grid_start = month_start - Duration::days(i64::from(month_start.weekday().num_days_from_sunday()));
        let grid_end = month_end + Duration::days(i64::from(6 - month_end.weekday().num_days_from_sunday()));

        let mut cells = Vec::new();
        let mut current = grid_start;
        while current <= grid_end {
            cells.push(DayCell {
                date: current,
                day: current.day(),
                is_today: current == self.today,
                is_weekend: matches!(current.weekday(), Weekday::Sat | Weekday::Sun),
                in_month: month_start <= current && current <= month_end,
                reminders: self.store.get_by_key(&DateKey::from(current)).to_vec(),
            });
            current = match current.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        Ok(cells)
    }
}

/// The month after the given one, rolling over December
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// The month before the given one, rolling over January
pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn end_of_month(month_start: NaiveDate) -> NaiveDate {
    let (next_year, next) = next_month(month_start.year(), month_start.month());
    NaiveDate::from_ymd_opt(next_year, next, 1)
        .expect("valid date")
        .pred_opt()
        .expect("valid date")
}
