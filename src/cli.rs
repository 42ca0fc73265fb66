use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::render::OutputFormat;
use crate::source::{HttpSource, MemorySource, TaskSource};
use crate::util;

#[derive(Parser, Debug)]
#[command(
    name = "weekly-hours-report",
    version,
    about = "Aggregate tracked work into ISO weeks and render plain or wiki reports",
    long_about = None
)]
pub struct Cli {
  /// JSON task store to read tasks from
  #[arg(long)]
  pub tasks: Option<PathBuf>,

  /// Base URL of a task tracker answering batched task queries
  #[arg(long)]
  pub source_url: Option<String>,

  /// Project name or unique part of one
  #[arg(long)]
  pub project: Option<String>,

  /// Customer name or unique part of one
  #[arg(long)]
  pub customer: Option<String>,

  /// User login/name or unique part of one
  #[arg(long)]
  pub user: Option<String>,

  /// Weeks to report, e.g. "5", "5/2023", "3-7", "1,4,40-" (open end = through this week)
  #[arg(long)]
  pub weeks: Option<String>,

  /// Report every week from the first to the last recorded task
  #[arg(long)]
  pub all_weeks: bool,

  /// With several weeks, also emit one detailed page per week under the summary
  #[arg(long)]
  pub detailed: bool,

  /// Output dialect
  #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
  pub format: OutputFormat,

  /// Output location: "-" prints to stdout; otherwise a directory receiving one file per page plus manifest.json
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Log progress to stderr
  #[arg(long, short)]
  pub verbose: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override "today" for week defaults (hidden; tests only)
  #[arg(long = "today-override", hide = true)]
  pub today_override: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum SourceSpec {
  File { path: String },
  Http { base_url: String },
}

impl SourceSpec {
  pub fn open(&self) -> Result<Arc<dyn TaskSource>> {
    Ok(match self {
      SourceSpec::File { path } => Arc::new(MemorySource::from_json_file(path)?),
      SourceSpec::Http { base_url } => Arc::new(HttpSource::new(base_url)),
    })
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum WeekSelection {
  Spec { spec: String },
  History,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EffectiveConfig {
  pub source: SourceSpec,
  pub weeks: WeekSelection,
  pub project: Option<String>,
  pub customer: Option<String>,
  pub user: Option<String>,
  pub detailed: bool,
  pub format: OutputFormat,
  pub out: String,
  pub verbose: bool,
  pub today_override: Option<NaiveDate>,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let source = match (&cli.tasks, &cli.source_url) {
    (Some(path), None) => SourceSpec::File { path: util::canonicalize_lossy(path) },
    (None, Some(url)) => SourceSpec::Http { base_url: url.clone() },
    (None, None) => bail!("Provide a task source: --tasks FILE or --source-url URL"),
    _ => bail!("Ambiguous task source: choose only one of --tasks | --source-url"),
  };

  let weeks = match (&cli.weeks, cli.all_weeks) {
    (Some(spec), false) => WeekSelection::Spec { spec: spec.clone() },
    (None, true) => WeekSelection::History,
    (None, false) => bail!("Provide one of --weeks SPEC or --all-weeks"),
    (Some(_), true) => bail!("Ambiguous week selection: choose only one of --weeks | --all-weeks"),
  };

  if cli.project.is_none() && cli.customer.is_none() && cli.user.is_none() {
    bail!("Provide at least one of --project, --customer or --user");
  }

  let today_override = util::parse_today_override(cli.today_override.as_deref())?;

  Ok(EffectiveConfig {
    source,
    weeks,
    project: cli.project,
    customer: cli.customer,
    user: cli.user,
    detailed: cli.detailed,
    format: cli.format,
    out: cli.out,
    verbose: cli.verbose,
    today_override,
  })
}
