use std::sync::Arc;

use chrono::NaiveDate;
use weekly_hours_report::cli::WeekSelection;
use weekly_hours_report::model::TaskFilter;
use weekly_hours_report::render::OutputFormat;
use weekly_hours_report::report_processor::{build_periods, build_reports, render_reports};
use weekly_hours_report::source::{MemorySource, TaskStore};

fn render(spec: &str, format: OutputFormat) -> Vec<String> {
  let store: TaskStore = test_support::read_fixture_json("tasks.json");
  let source = Arc::new(MemorySource::from_store(store));
  let filter = TaskFilter::for_project("Apollo");
  let selection = WeekSelection::Spec { spec: spec.into() };
  let today = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();

  let periods = build_periods(&selection, &filter, source, today).unwrap();
  let reports = build_reports(&selection, false, &filter, periods);
  render_reports(&reports, format)
    .unwrap()
    .into_iter()
    .map(|p| normalize(&p.body))
    .collect()
}

// Empty list items end in "- "; drop trailing blanks so snapshots stay editor-safe.
fn normalize(body: &str) -> String {
  body.lines().map(str::trim_end).collect::<Vec<_>>().join("\n").trim().to_string()
}

#[test]
fn aggregate_over_ten_weeks_is_paginated() {
  test_support::init_tracing();
  let pages = render("1-12/2023", OutputFormat::Wiki);
  assert_eq!(pages.len(), 1);
  test_support::insta_settings().bind(|| {
    insta::assert_snapshot!("aggregate_paginated", pages[0]);
  });
}

#[test]
fn detailed_week_page() {
  test_support::init_tracing();
  let pages = render("5/2023", OutputFormat::Wiki);
  assert_eq!(pages.len(), 1);
  test_support::insta_settings().bind(|| {
    insta::assert_snapshot!("detailed_week", pages[0]);
  });
}

#[test]
fn plain_rendering_is_stable() {
  let first = render("5-6/2023", OutputFormat::Plain);
  let second = render("5-6/2023", OutputFormat::Plain);
  assert_eq!(first, second);
}
