use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;
use weekly_hours_report::calendar::{
  format_duration, monday_of, monday_of_iso_week, week_number_of, weeks_in_iso_year, weeks_spanning,
};

proptest! {
  #[test]
  fn iso_week_round_trips(year in 1970i32..2100, week in 1u32..=53) {
    prop_assume!(week <= weeks_in_iso_year(year));
    let monday = monday_of_iso_week(year, week).unwrap();
    prop_assert_eq!(monday.weekday(), chrono::Weekday::Mon);
    prop_assert_eq!(week_number_of(monday), (year, week));
  }

  #[test]
  fn single_day_spans_its_own_week(days in 0i64..60_000) {
    let d = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap() + Duration::days(days);
    prop_assert_eq!(weeks_spanning(d, d), vec![monday_of(d)]);
  }

  #[test]
  fn spans_are_consecutive_mondays(start in 0i64..40_000, len in 0i64..400) {
    let a = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap() + Duration::days(start);
    let b = a + Duration::days(len);
    let weeks = weeks_spanning(a, b);
    prop_assert_eq!(weeks[0], monday_of(a));
    prop_assert_eq!(*weeks.last().unwrap(), monday_of(b));
    for pair in weeks.windows(2) {
      prop_assert_eq!(pair[1] - pair[0], Duration::days(7));
    }
  }
}

#[test]
fn week_one_edge_cases() {
  // Jan 4 2021 is a Monday; Jan 1 2023 is a Sunday
  assert_eq!(monday_of_iso_week(2021, 1), NaiveDate::from_ymd_opt(2021, 1, 4));
  assert_eq!(monday_of_iso_week(2023, 1), NaiveDate::from_ymd_opt(2023, 1, 2));
  assert_eq!(week_number_of(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()), (2022, 52));
  assert_eq!(week_number_of(NaiveDate::from_ymd_opt(2021, 1, 3).unwrap()), (2020, 53));
}

#[test]
fn durations_format_as_hours_and_minutes() {
  assert_eq!(format_duration(Duration::minutes(90)), "01:30");
  assert_eq!(format_duration(Duration::hours(25)), "25:00");
}
