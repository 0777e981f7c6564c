//! Date rules for the booking calendar.

use chrono::{Datelike, NaiveDate, Weekday};

/// A date can be booked if it is today or later and not a Sunday.
pub fn is_selectable(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today && date.weekday() != Weekday::Sun
}

/// Human-readable form used in transcripts and stored bookings,
/// e.g. `Mon, Sep 7, 2026`.
pub fn format_long(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

/// One renderable month: how many blank cells lead the first week (Sunday
/// first) and how many day cells follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub leading_blanks: u32,
    pub days: u32,
}

pub fn month_grid(year: i32, month: u32) -> Option<MonthGrid> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let days = next_month.signed_duration_since(first).num_days() as u32;

    Some(MonthGrid {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    })
}
