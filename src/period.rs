//! Contiguous runs of days and the tasks recorded in them.
//!
//! A `Period` fetches its tasks at most once. Either it loads itself on first
//! read, or a caller that built many periods fills them all from one batched
//! fetch (see [`fetch_all_tasks`]).

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use once_cell::sync::OnceCell;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::calendar;
use crate::model::{TaskFilter, TaskRecord, User};
use crate::source::TaskSource;

/// ISO (year, week) identity of a week period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoWeek {
  pub year: i32,
  pub week: u32,
}

pub struct Period {
  start: NaiveDate,
  num_days: u32,
  week: Option<IsoWeek>,
  filter: TaskFilter,
  source: Arc<dyn TaskSource>,
  tasks: OnceCell<Vec<TaskRecord>>,
  users: OnceCell<BTreeSet<User>>,
}

/// Optional criteria for [`Period::filter_tasks`]; all set criteria must hold.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery<'a> {
  pub date: Option<NaiveDate>,
  pub day_offset: Option<u32>,
  pub user: Option<&'a User>,
  pub onsite_only: bool,
}

impl<'a> TaskQuery<'a> {
  pub fn all() -> Self {
    Self::default()
  }

  pub fn on(mut self, date: NaiveDate) -> Self {
    self.date = Some(date);
    self
  }

  pub fn day(mut self, offset: u32) -> Self {
    self.day_offset = Some(offset);
    self
  }

  pub fn user(mut self, user: &'a User) -> Self {
    self.user = Some(user);
    self
  }

  pub fn onsite(mut self) -> Self {
    self.onsite_only = true;
    self
  }
}

impl Period {
  pub fn new(start: NaiveDate, num_days: u32, filter: &TaskFilter, source: Arc<dyn TaskSource>) -> Self {
    let last = start + Duration::days(num_days.max(1) as i64 - 1);
    Self {
      start,
      num_days,
      week: None,
      filter: filter.bound_to(start, last),
      source,
      tasks: OnceCell::new(),
      users: OnceCell::new(),
    }
  }

  /// Seven-day period starting on the Monday of ISO week `week` of `year`.
  pub fn week(year: i32, week: u32, filter: &TaskFilter, source: Arc<dyn TaskSource>) -> Result<Self> {
    let monday = calendar::monday_of_iso_week(year, week)
      .ok_or_else(|| anyhow::anyhow!("week {week} of {year} is out of range"))?;
    let mut period = Self::new(monday, 7, filter, source);
    period.week = Some(IsoWeek { year, week });
    Ok(period)
  }

  pub fn start_date(&self) -> NaiveDate {
    self.start
  }

  pub fn end_date(&self) -> NaiveDate {
    self.start + Duration::days(self.num_days.max(1) as i64 - 1)
  }

  pub fn iso_week(&self) -> Option<IsoWeek> {
    self.week
  }

  /// The date-bound filter this period fetches with.
  pub fn filter(&self) -> &TaskFilter {
    &self.filter
  }

  pub fn is_loaded(&self) -> bool {
    self.tasks.get().is_some()
  }

  /// Install tasks fetched elsewhere. A period that already holds tasks keeps them.
  pub fn set_tasks(&self, tasks: Vec<TaskRecord>) {
    if self.tasks.set(tasks).is_err() {
      warn!(period = %self.short_label(), "tasks already loaded; ignoring second assignment");
    }
  }

  /// Tasks in this period, fetched on first use.
  pub fn tasks(&self) -> Result<&[TaskRecord]> {
    let tasks = self.tasks.get_or_try_init(|| -> Result<Vec<TaskRecord>> {
      debug!(period = %self.short_label(), "fetching tasks for single period");
      let mut batches = self.source.fetch_tasks_for_filters(std::slice::from_ref(&self.filter))?;
      Ok(batches.pop().unwrap_or_default())
    })?;
    Ok(tasks.as_slice())
  }

  /// Distinct users appearing in [`Period::tasks`].
  pub fn users(&self) -> Result<&BTreeSet<User>> {
    let tasks = self.tasks()?;
    Ok(self.users.get_or_init(|| tasks.iter().map(|t| t.user.clone()).collect()))
  }

  /// Every date from the start through the last day, in order.
  pub fn all_dates(&self) -> Vec<NaiveDate> {
    (0..self.num_days).map(|i| self.start + Duration::days(i as i64)).collect()
  }

  pub fn filter_tasks(&self, query: &TaskQuery<'_>) -> Result<Vec<&TaskRecord>> {
    let date = query
      .date
      .or_else(|| query.day_offset.map(|off| self.start + Duration::days(off as i64)));

    Ok(
      self
        .tasks()?
        .iter()
        .filter(|t| date.map_or(true, |d| t.date == d))
        .filter(|t| query.user.map_or(true, |u| &t.user == u))
        .filter(|t| !query.onsite_only || t.onsite)
        .collect(),
    )
  }

  pub fn time_worked(&self, query: &TaskQuery<'_>) -> Result<Duration> {
    Ok(
      self
        .filter_tasks(query)?
        .iter()
        .fold(Duration::zero(), |acc, t| acc + t.duration_worked()),
    )
  }

  /// Compact label (`2023-W05` for weeks).
  pub fn short_label(&self) -> String {
    match self.week {
      Some(w) => format!("{:04}-W{:02}", w.year, w.week),
      None => format!("{}+{}d", self.start.format("%Y-%m-%d"), self.num_days),
    }
  }

  /// Alphanumeric fragment for page identifiers.
  pub fn wiki_string(&self) -> String {
    match self.week {
      Some(w) => format!("{:04}W{:02}", w.year, w.week),
      None => format!("{}Plus{}Days", self.start.format("%Y%m%d"), self.num_days),
    }
  }
}

impl fmt::Display for Period {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.week {
      Some(_) => write!(
        f,
        "{} ({} - {})",
        self.short_label(),
        self.start.format("%d %b"),
        self.end_date().format("%d %b %Y")
      ),
      None => write!(f, "{} - {}", self.start.format("%d %b %Y"), self.end_date().format("%d %b %Y")),
    }
  }
}

impl fmt::Debug for Period {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Period")
      .field("start", &self.start)
      .field("num_days", &self.num_days)
      .field("week", &self.week)
      .field("loaded", &self.is_loaded())
      .finish()
  }
}

/// Load every not-yet-loaded period with a single batched fetch.
pub fn fetch_all_tasks(periods: &[Arc<Period>], source: &dyn TaskSource) -> Result<()> {
  let pending: Vec<&Arc<Period>> = periods.iter().filter(|p| !p.is_loaded()).collect();
  if pending.is_empty() {
    return Ok(());
  }

  let filters: Vec<TaskFilter> = pending.iter().map(|p| p.filter().clone()).collect();
  let batches = source.fetch_tasks_for_filters(&filters)?;
  if batches.len() != pending.len() {
    anyhow::bail!("task source answered {} batches for {} periods", batches.len(), pending.len());
  }

  debug!(periods = pending.len(), "filled periods from one batched fetch");
  for (period, tasks) in pending.into_iter().zip(batches) {
    period.set_tasks(tasks);
  }

  Ok(())
}
