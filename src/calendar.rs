// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: ISO-8601 week arithmetic (week Mondays, week numbers, spans) and worked-time formatting
// role: calendar/helpers
// inputs: NaiveDate values, (iso_year, iso_week) pairs, chrono::Duration spans
// outputs: Mondays, ordered Monday sequences, HH:MM strings
// invariants:
// - monday_of_iso_week(y, w) is the Monday of ISO week w of ISO year y
// - weeks_spanning always yields at least the first week
// - format_duration hours are not wrapped at 24
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{Datelike, Duration, NaiveDate};

/// Monday starting ISO week `week` of ISO year `year`.
///
/// Starts from the Monday-based week count of the calendar year (week 1 begins on
/// the first Monday of January) and steps back a week when Jan 4 falls on a
/// Friday, Saturday or Sunday, which is exactly when that count runs one week
/// ahead of ISO-8601.
pub fn monday_of_iso_week(year: i32, week: u32) -> Option<NaiveDate> {
  let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
  let to_first_monday = (7 - jan1.weekday().num_days_from_monday()) % 7;
  let candidate = jan1
    .checked_add_signed(Duration::days(to_first_monday as i64))?
    .checked_add_signed(Duration::weeks(week as i64 - 1))?;

  let jan4 = NaiveDate::from_ymd_opt(year, 1, 4)?;
  if jan4.weekday().number_from_monday() > 4 {
    candidate.checked_sub_signed(Duration::weeks(1))
  } else {
    Some(candidate)
  }
}

/// ISO (year, week) containing `date`; the year may differ from `date.year()`.
pub fn week_number_of(date: NaiveDate) -> (i32, u32) {
  let iso = date.iso_week();
  (iso.year(), iso.week())
}

/// Monday of the ISO week containing `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
  let (year, week) = week_number_of(date);
  monday_of_iso_week(year, week).unwrap_or_else(|| date - Duration::days(date.weekday().num_days_from_monday() as i64))
}

pub fn next_week(date: NaiveDate) -> NaiveDate {
  date + Duration::weeks(1)
}

/// Number of ISO weeks in `year` (52 or 53).
pub fn weeks_in_iso_year(year: i32) -> u32 {
  NaiveDate::from_ymd_opt(year, 12, 28)
    .map(|d| d.iso_week().week())
    .unwrap_or(52)
}

/// Week-start Mondays from the week of `start` through the week of `end`, inclusive.
///
/// A reversed range still yields the week of `start`.
pub fn weeks_spanning(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
  let last = monday_of(end);
  let mut cursor = monday_of(start);
  let mut out = vec![cursor];

  while cursor < last {
    cursor = next_week(cursor);
    out.push(cursor);
  }

  out
}

/// Render a span as `HH:MM`; hours keep counting past a day.
pub fn format_duration(span: Duration) -> String {
  let minutes = span.num_minutes();
  format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
