// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate a run: resolve the filter, build periods, choose reports, render them and save the pages
// role: processing/orchestrator
// inputs: EffectiveConfig, Arc<dyn TaskSource>, optional today override
// outputs: Report pages on stdout or files on disk plus manifest.json; stdout pointer when writing a directory
// side_effects: Creates directories; writes page files; prints to stdout
// invariants:
// - periods are populated by a single batched fetch before any report reads them
// - a single explicitly requested week yields one detailed report without a parent
// - detailed reports follow their aggregate parent in generation order
// - wiki pages have every other page's short label rewritten into a link
// - page file name is <wikiIdentifier>.<txt|twiki>
// errors: Propagates source/parse/render/write errors with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::cli::{EffectiveConfig, WeekSelection};
use crate::links::{link_reports, LinkTarget};
use crate::manifest::{write_page_manifest, PageEntry};
use crate::model::TaskFilter;
use crate::period::Period;
use crate::render::OutputFormat;
use crate::report::{AggregateReport, DetailedReport, ParentRef, Report};
use crate::source::TaskSource;
use crate::util;
use crate::weeks;

/// A report rendered to its final page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
  pub identifier: String,
  pub header: String,
  pub parent: Option<String>,
  pub body: String,
}

pub fn build_periods(
  selection: &WeekSelection,
  filter: &TaskFilter,
  source: Arc<dyn TaskSource>,
  today: NaiveDate,
) -> Result<Vec<Arc<Period>>> {
  match selection {
    WeekSelection::Spec { spec } => weeks::from_week_spec(spec, filter, source, today),
    WeekSelection::History => weeks::from_project_history(filter, source),
  }
}

pub fn build_reports(
  selection: &WeekSelection,
  detailed: bool,
  filter: &TaskFilter,
  periods: Vec<Arc<Period>>,
) -> Vec<Report> {
  if periods.is_empty() {
    info!(filter = %filter.describe(), "no periods to report");
    return Vec::new();
  }

  if matches!(selection, WeekSelection::Spec { .. }) && periods.len() == 1 {
    return periods
      .into_iter()
      .map(|p| Report::Detailed(DetailedReport::new(p, filter)))
      .collect();
  }

  let aggregate = AggregateReport::new(filter, periods);
  let parent = ParentRef::from(&aggregate);
  let children: Vec<Report> = if detailed {
    aggregate
      .periods()
      .iter()
      .map(|p| Report::Detailed(DetailedReport::with_parent(p.clone(), filter, parent.clone())))
      .collect()
  } else {
    Vec::new()
  };

  let mut reports = vec![Report::Aggregate(aggregate)];
  reports.extend(children);
  reports
}

/// Render every report; wiki pages also get links to the other pages' periods.
pub fn render_reports(reports: &[Report], format: OutputFormat) -> Result<Vec<RenderedPage>> {
  let targets: Vec<LinkTarget> = reports
    .iter()
    .filter_map(|r| {
      r.period().map(|p| LinkTarget { label: p.short_label(), identifier: r.wiki_identifier() })
    })
    .collect();

  let mut pages = Vec::with_capacity(reports.len());
  for report in reports {
    let identifier = report.wiki_identifier();
    let mut body = report.generate(format)?;
    if format == OutputFormat::Wiki {
      let others: Vec<LinkTarget> = targets.iter().filter(|t| t.identifier != identifier).cloned().collect();
      body = link_reports(&body, &others);
    }
    pages.push(RenderedPage {
      identifier,
      header: report.header(),
      parent: report.parent_identifier(),
      body,
    });
  }
  Ok(pages)
}

/// Stdout form: bodies back to back, each already opening with a blank line.
pub fn join_pages(pages: &[RenderedPage]) -> String {
  pages.iter().map(|p| p.body.as_str()).collect()
}

/// Write one file per page plus `manifest.json`; returns the prepared directory.
pub fn save_pages(
  out: &str,
  format: OutputFormat,
  generated_on: NaiveDate,
  pages: &[RenderedPage],
) -> Result<String> {
  let base_dir = util::prepare_out_dir(out)?;
  let mut entries = Vec::with_capacity(pages.len());

  for page in pages {
    let file = format!("{}.{}", page.identifier, format.file_extension());
    let path = std::path::Path::new(&base_dir).join(&file);
    std::fs::write(&path, &page.body).with_context(|| format!("writing {}", path.display()))?;
    debug!(file = %path.display(), "wrote page");
    entries.push(PageEntry {
      identifier: page.identifier.clone(),
      header: page.header.clone(),
      parent: page.parent.clone(),
      file,
    });
  }

  write_page_manifest(generated_on, format, &base_dir, &entries)?;
  Ok(base_dir)
}

pub fn process_with_source(cfg: &EffectiveConfig, source: Arc<dyn TaskSource>) -> Result<()> {
  let today = util::effective_today(cfg.today_override);

  let directory = source.directory().context("loading project/customer/user directory")?;
  let filter = directory.resolve_filter(cfg.project.as_deref(), cfg.customer.as_deref(), cfg.user.as_deref())?;
  info!(filter = %filter.describe(), "resolved task filter");

  let periods = build_periods(&cfg.weeks, &filter, source, today)?;
  let reports = build_reports(&cfg.weeks, cfg.detailed, &filter, periods);
  let pages = render_reports(&reports, cfg.format)?;

  if cfg.out == "-" {
    if !pages.is_empty() {
      print!("{}", join_pages(&pages));
    }
    return Ok(());
  }

  let base_dir = save_pages(&cfg.out, cfg.format, today, &pages)?;
  println!(
    "{}",
    serde_json::to_string_pretty(&serde_json::json!({"dir": base_dir, "manifest": "manifest.json"}))?
  );
  Ok(())
}

pub fn process(cfg: &EffectiveConfig) -> Result<()> {
  let source = cfg.source.open()?;
  process_with_source(cfg, source)
}
