//! Report object model: per-week summaries and per-user/per-day breakdowns.
//!
//! Reports only read from fully populated periods and emit their content through
//! a [`Formatter`], so the same report renders to either output format.

use anyhow::Result;
use chrono::Duration;
use std::sync::Arc;
use tracing::debug;

use crate::calendar::format_duration;
use crate::model::TaskFilter;
use crate::period::{Period, TaskQuery};
use crate::render::{Formatter, OutputFormat};
use crate::util;

/// One summary row per period plus grand totals.
#[derive(Debug)]
pub struct AggregateReport {
  header: String,
  periods: Vec<Arc<Period>>,
}

impl AggregateReport {
  pub fn new(filter: &TaskFilter, periods: Vec<Arc<Period>>) -> Self {
    Self { header: format!("Hours per week for {}", filter.describe()), periods }
  }

  pub fn header(&self) -> &str {
    &self.header
  }

  pub fn wiki_identifier(&self) -> String {
    util::alphanumeric(&self.header)
  }

  pub fn periods(&self) -> &[Arc<Period>] {
    &self.periods
  }

  /// `[label, worked]` per period, with an onsite suffix when any onsite time was booked.
  pub fn rows(&self) -> Result<Vec<Vec<String>>> {
    self
      .periods
      .iter()
      .map(|p| {
        let worked = p.time_worked(&TaskQuery::all())?;
        let onsite = p.time_worked(&TaskQuery::all().onsite())?;
        let mut cell = format_duration(worked);
        if onsite > Duration::zero() {
          cell.push_str(&format!(" ({} onsite)", format_duration(onsite)));
        }
        Ok(vec![p.short_label(), cell])
      })
      .collect()
  }

  pub fn generate(&self, out: &mut dyn Formatter) -> Result<()> {
    let mut total = Duration::zero();
    let mut onsite = Duration::zero();
    for p in &self.periods {
      total = total + p.time_worked(&TaskQuery::all())?;
      onsite = onsite + p.time_worked(&TaskQuery::all().onsite())?;
    }

    out.header(&self.header);
    out.table(&self.rows()?, false);
    out.header(&format!("Total: {}", format_duration(total)));
    out.header(&format!("Total onsite: {}", format_duration(onsite)));
    Ok(())
  }
}

/// Page a detailed report nests under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
  pub header: String,
  pub wiki_identifier: String,
}

impl From<&AggregateReport> for ParentRef {
  fn from(agg: &AggregateReport) -> Self {
    Self { header: agg.header().to_string(), wiki_identifier: agg.wiki_identifier() }
  }
}

/// Hours per user per day for one period, plus each user's daily stories.
#[derive(Debug)]
pub struct DetailedReport {
  period: Arc<Period>,
  filter_description: String,
  parent: Option<ParentRef>,
}

impl DetailedReport {
  pub fn new(period: Arc<Period>, filter: &TaskFilter) -> Self {
    Self { period, filter_description: filter.describe(), parent: None }
  }

  pub fn with_parent(period: Arc<Period>, filter: &TaskFilter, parent: ParentRef) -> Self {
    Self { period, filter_description: filter.describe(), parent: Some(parent) }
  }

  pub fn period(&self) -> &Period {
    &self.period
  }

  pub fn parent(&self) -> Option<&ParentRef> {
    self.parent.as_ref()
  }

  pub fn header(&self) -> String {
    match &self.parent {
      Some(parent) => format!("{} for {}", self.period, parent.header),
      None => format!("{} for {}", self.period, self.filter_description),
    }
  }

  pub fn wiki_identifier(&self) -> String {
    match &self.parent {
      Some(parent) => format!("{}-{}", parent.wiki_identifier, self.period.wiki_string()),
      None => self.period.wiki_string(),
    }
  }

  /// Header row of day labels, one row per user, then an `everyone` row.
  pub fn hour_matrix(&self) -> Result<Vec<Vec<String>>> {
    let dates = self.period.all_dates();

    let mut header = vec![String::new()];
    header.extend(dates.iter().map(|d| d.format("%d %b").to_string()));
    header.push("Total".to_string());

    let mut rows = vec![header];

    for user in self.period.users()? {
      let mut row = vec![user.to_string()];
      for date in &dates {
        row.push(format_duration(self.period.time_worked(&TaskQuery::all().on(*date).user(user))?));
      }
      row.push(format_duration(self.period.time_worked(&TaskQuery::all().user(user))?));
      rows.push(row);
    }

    let mut everyone = vec!["everyone".to_string()];
    for date in &dates {
      everyone.push(format_duration(self.period.time_worked(&TaskQuery::all().on(*date))?));
    }
    everyone.push(format_duration(self.period.time_worked(&TaskQuery::all())?));
    rows.push(everyone);

    Ok(rows)
  }

  pub fn generate(&self, out: &mut dyn Formatter) -> Result<()> {
    out.header(&self.header());
    out.table(&self.hour_matrix()?, true);

    let onsite = self.period.time_worked(&TaskQuery::all().onsite())?;
    if onsite > Duration::zero() {
      out.large_text(&format!("Onsite: {}", format_duration(onsite)));
    }

    let dates = self.period.all_dates();
    for user in self.period.users()? {
      out.section_header(&format!("Stories for {user}"));

      let mut pairs = Vec::with_capacity(dates.len());
      for date in &dates {
        let text = self
          .period
          .filter_tasks(&TaskQuery::all().on(*date).user(user))?
          .iter()
          .map(|t| format!("{} {}", t.text, t.story))
          .collect::<Vec<_>>()
          .join(" ");
        pairs.push((date.format("%A").to_string(), util::squash_whitespace(&text)));
      }
      out.aligned_list(&pairs);
    }

    Ok(())
  }
}

/// The two report kinds, each with an optional period used for cross-linking.
#[derive(Debug)]
pub enum Report {
  Aggregate(AggregateReport),
  Detailed(DetailedReport),
}

impl Report {
  pub fn header(&self) -> String {
    match self {
      Report::Aggregate(r) => r.header().to_string(),
      Report::Detailed(r) => r.header(),
    }
  }

  pub fn wiki_identifier(&self) -> String {
    match self {
      Report::Aggregate(r) => r.wiki_identifier(),
      Report::Detailed(r) => r.wiki_identifier(),
    }
  }

  pub fn parent_identifier(&self) -> Option<String> {
    match self {
      Report::Aggregate(_) => None,
      Report::Detailed(r) => r.parent().map(|p| p.wiki_identifier.clone()),
    }
  }

  /// Period other reports link to; aggregates span many and have none.
  pub fn period(&self) -> Option<&Period> {
    match self {
      Report::Aggregate(_) => None,
      Report::Detailed(r) => Some(r.period()),
    }
  }

  pub fn generate(&self, format: OutputFormat) -> Result<String> {
    let mut out = format.formatter();
    match self {
      Report::Aggregate(r) => r.generate(out.as_mut())?,
      Report::Detailed(r) => r.generate(out.as_mut())?,
    }
    debug!(report = %self.wiki_identifier(), ?format, "generated report");
    Ok(out.flatten())
  }
}
