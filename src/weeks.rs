//! Build series of week periods, either from a week specification such as
//! `1,5-7/2023,40-` or from the full task history behind a filter.
//!
//! Ranges never cross a year boundary: `50-5` is rejected rather than read as
//! "week 50 through week 5 of the following year".

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

use crate::calendar;
use crate::model::{TaskFilter, TaskRecord};
use crate::period::{fetch_all_tasks, IsoWeek, Period};
use crate::source::TaskSource;

/// `week` or `week/year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WeekToken {
  week: u32,
  year: Option<i32>,
}

fn parse_token(raw: &str) -> Result<WeekToken> {
  let tok = raw.trim();
  let (week_s, year_s) = match tok.split_once('/') {
    Some((w, y)) => (w.trim(), Some(y.trim())),
    None => (tok, None),
  };

  let week: u32 = week_s
    .parse()
    .with_context(|| format!("invalid week token \"{tok}\" in week specification"))?;
  let year = match year_s {
    Some(y) => Some(
      y.parse::<i32>()
        .with_context(|| format!("invalid year in week token \"{tok}\""))?,
    ),
    None => None,
  };

  Ok(WeekToken { week, year })
}

fn checked_week(year: i32, week: u32) -> Result<IsoWeek> {
  let last = calendar::weeks_in_iso_year(year);
  if week == 0 || week > last {
    bail!("week {week} does not exist in {year} (weeks 1-{last})");
  }
  Ok(IsoWeek { year, week })
}

/// Expand a week specification into ISO weeks, in the order written.
///
/// A range takes its year from whichever end names one. Otherwise years default
/// to the calendar year of `today`. An open range end (`40-`) runs through the
/// ISO week containing `today`, or through the last week of the range's year
/// when that year is already over. Weeks named more than once are kept at
/// their first position only.
pub fn parse_week_spec(spec: &str, today: NaiveDate) -> Result<Vec<IsoWeek>> {
  let mut out = Vec::new();
  let mut seen = HashSet::new();
  let current = today.iso_week();

  for term in spec.split(',') {
    let term = term.trim();
    if term.is_empty() {
      bail!("empty term in week specification \"{spec}\"");
    }

    match term.split_once('-') {
      None => {
        let tok = parse_token(term)?;
        let week = checked_week(tok.year.unwrap_or(today.year()), tok.week)?;
        if seen.insert(week) {
          out.push(week);
        }
      }
      Some((start_s, end_s)) => {
        let start = parse_token(start_s)?;
        let end = if end_s.trim().is_empty() { None } else { Some(parse_token(end_s)?) };

        // a year on either end applies to the whole range; in the first days
        // of January today may still sit in the previous ISO year
        let year = start.year.or(end.and_then(|e| e.year)).unwrap_or_else(|| {
          if end.is_none() {
            today.year().min(current.year())
          } else {
            today.year()
          }
        });

        let end_week = match end {
          None if year == current.year() => current.week(),
          None if year < current.year() => calendar::weeks_in_iso_year(year),
          None => bail!("open week range \"{term}\" starts in a future year"),
          Some(end) => {
            if end.year.is_some_and(|y| y != year) {
              bail!("cross-year week ranges are not supported: \"{term}\"");
            }
            end.week
          }
        };

        if end_week < start.week {
          bail!("week range \"{term}\" ends before it starts");
        }

        for week in start.week..=end_week {
          let week = checked_week(year, week)?;
          if seen.insert(week) {
            out.push(week);
          }
        }
      }
    }
  }

  Ok(out)
}

/// One week period per entry of `spec`, all filled by a single batched fetch.
pub fn from_week_spec(
  spec: &str,
  filter: &TaskFilter,
  source: Arc<dyn TaskSource>,
  today: NaiveDate,
) -> Result<Vec<Arc<Period>>> {
  let weeks = parse_week_spec(spec, today)?;
  let periods = weeks
    .iter()
    .map(|w| Period::week(w.year, w.week, filter, source.clone()).map(Arc::new))
    .collect::<Result<Vec<_>>>()?;

  debug!(spec, periods = periods.len(), "built week periods from specification");
  fetch_all_tasks(&periods, source.as_ref())?;
  Ok(periods)
}

/// One week period per week between the first and last task matching `filter`.
///
/// Tasks are fetched once and distributed into their weeks, so no period
/// fetches again. Returns no periods when nothing matches.
pub fn from_project_history(filter: &TaskFilter, source: Arc<dyn TaskSource>) -> Result<Vec<Arc<Period>>> {
  let tasks: Vec<TaskRecord> = source
    .fetch_tasks_for_filters(std::slice::from_ref(filter))?
    .pop()
    .unwrap_or_default();

  let (first, last) = match (tasks.iter().map(|t| t.date).min(), tasks.iter().map(|t| t.date).max()) {
    (Some(a), Some(b)) => (a, b),
    _ => {
      info!(filter = %filter.describe(), "no tasks recorded; nothing to report");
      return Ok(Vec::new());
    }
  };

  let periods = calendar::weeks_spanning(first, last)
    .into_iter()
    .map(|monday| {
      let (year, week) = calendar::week_number_of(monday);
      Period::week(year, week, filter, source.clone()).map(Arc::new)
    })
    .collect::<Result<Vec<_>>>()?;

  let index: HashMap<IsoWeek, usize> = periods
    .iter()
    .enumerate()
    .filter_map(|(i, p)| p.iso_week().map(|w| (w, i)))
    .collect();

  let mut buckets: Vec<Vec<TaskRecord>> = vec![Vec::new(); periods.len()];
  for task in tasks {
    let (year, week) = calendar::week_number_of(task.date);
    if let Some(&i) = index.get(&IsoWeek { year, week }) {
      buckets[i].push(task);
    }
  }

  for (period, bucket) in periods.iter().zip(buckets) {
    period.set_tasks(bucket);
  }

  debug!(weeks = periods.len(), %first, %last, "bucketed project history into weeks");
  Ok(periods)
}
