use predicates::prelude::*;
use test_support::{cmd_bin, fixture_path};

fn report_cmd(args: &[&str]) -> assert_cmd::Command {
  let tasks = fixture_path("tasks.json");
  let mut cmd = cmd_bin("weekly-hours-report");
  cmd.arg("--tasks").arg(tasks).args(["--today-override", "2023-06-15"]).args(args);
  cmd
}

#[test]
fn single_week_prints_detailed_plain_report() {
  report_cmd(&["--project", "Apollo", "--weeks", "5/2023"])
    .assert()
    .success()
    .stdout(predicate::str::contains("2023-W05 (30 Jan - 05 Feb 2023) for project Apollo"))
    .stdout(predicate::str::contains("Alice Liddell"))
    .stdout(predicate::str::contains("Onsite: 01:30"))
    .stdout(predicate::str::contains("Stories for Bob Builder"))
    .stdout(predicate::str::contains("kickoff APO-1"))
    .stdout(predicate::str::contains("Hours per week").not());
}

#[test]
fn week_range_prints_aggregate_with_totals() {
  report_cmd(&["--project", "Apollo", "--weeks", "5-6"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Hours per week for project Apollo"))
    .stdout(predicate::str::contains("2023-W05  04:30 (01:30 onsite)"))
    .stdout(predicate::str::contains("2023-W06  00:45"))
    .stdout(predicate::str::contains("Total: 05:15"))
    .stdout(predicate::str::contains("Total onsite: 01:30"))
    .stdout(predicate::str::contains("Stories for").not());
}

#[test]
fn detailed_wiki_run_links_pages() {
  report_cmd(&["--project", "Apollo", "--weeks", "5-6/2023", "--format", "wiki", "--detailed"])
    .assert()
    .success()
    .stdout(predicate::str::contains("---++Hours per week for project Apollo"))
    .stdout(predicate::str::contains(
      "| [[HoursperweekforprojectApollo-2023W05][2023-W05]] | 04:30 (01:30 onsite) |",
    ))
    .stdout(predicate::str::contains(
      "   * *Wednesday* - follow-up on [[HoursperweekforprojectApollo-2023W05][2023-W05]] review",
    ))
    .stdout(predicate::str::contains("<font size=\"+2\">Onsite: 01:30</font>"));
}

#[test]
fn open_range_runs_through_today() {
  let tasks = fixture_path("tasks.json");
  cmd_bin("weekly-hours-report")
    .arg("--tasks")
    .arg(tasks)
    .args(["--project", "Apollo", "--weeks", "10-", "--today-override", "2023-03-22"])
    .assert()
    .success()
    .stdout(predicate::str::contains("2023-W10"))
    .stdout(predicate::str::contains("2023-W12  00:30"))
    .stdout(predicate::str::contains("2023-W13").not());
}

#[test]
fn customer_and_user_filters_combine() {
  report_cmd(&["--customer", "acme", "--user", "alice", "--weeks", "5/2023"])
    .assert()
    .success()
    .stdout(predicate::str::contains("for customer Acme, user alice"))
    .stdout(predicate::str::contains("landing page"))
    .stdout(predicate::str::contains("kickoff").not());
}

#[test]
fn ambiguous_project_lists_candidates() {
  report_cmd(&["--project", "apo", "--weeks", "5"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("matches several projects"))
    .stderr(predicate::str::contains("Apollo Guidance"));
}

#[test]
fn reversed_week_range_is_rejected() {
  report_cmd(&["--project", "Apollo", "--weeks", "7-3"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("ends before it starts"));
}

#[test]
fn malformed_week_token_is_rejected() {
  report_cmd(&["--project", "Apollo", "--weeks", "five"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid week token"));
}

#[test]
fn project_without_tasks_prints_nothing() {
  report_cmd(&["--project", "Gemini", "--all-weeks"])
    .assert()
    .success()
    .stdout(predicate::str::is_empty());
}

#[test]
fn missing_week_selection_is_an_error() {
  report_cmd(&["--project", "Apollo"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--weeks SPEC or --all-weeks"));
}
