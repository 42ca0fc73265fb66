// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the task-tracking records (users, projects, tasks) and the filter criteria used to select them
// role: model/types
// outputs: Serializable structs with stable field names shared by sources, periods and reports
// invariants: Users order by login; a filter bound to dates keeps its other criteria unchanged
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A person who records work. Ordered by login, which is the stable sort key in reports.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct User {
  pub login: String,
  #[serde(default)]
  pub name: String,
}

impl User {
  pub fn new(login: impl Into<String>, name: impl Into<String>) -> Self {
    Self { login: login.into(), name: name.into() }
  }
}

impl fmt::Display for User {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.name.is_empty() {
      f.write_str(&self.login)
    } else {
      f.write_str(&self.name)
    }
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Project {
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub customer: Option<String>,
}

/// One recorded unit of work. Read-only for everything downstream of the source.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TaskRecord {
  pub user: User,
  pub date: NaiveDate,
  #[serde(rename = "minutes")]
  pub minutes_worked: i64,
  #[serde(default)]
  pub onsite: bool,
  #[serde(default)]
  pub text: String,
  #[serde(default)]
  pub story: String,
  #[serde(default)]
  pub project: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub customer: Option<String>,
}

impl TaskRecord {
  pub fn duration_worked(&self) -> Duration {
    Duration::minutes(self.minutes_worked)
  }
}

/// Conjunction of match criteria. Unset criteria match everything.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub project: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub customer: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start: Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end: Option<NaiveDate>,
}

impl TaskFilter {
  pub fn for_project(name: impl Into<String>) -> Self {
    Self { project: Some(name.into()), ..Self::default() }
  }

  /// Copy of this filter restricted to `[start, end]` (both inclusive).
  pub fn bound_to(&self, start: NaiveDate, end: NaiveDate) -> Self {
    Self { start: Some(start), end: Some(end), ..self.clone() }
  }

  pub fn matches(&self, task: &TaskRecord) -> bool {
    if let Some(p) = &self.project {
      if &task.project != p {
        return false;
      }
    }
    if let Some(c) = &self.customer {
      if task.customer.as_ref() != Some(c) {
        return false;
      }
    }
    if let Some(u) = &self.user {
      if &task.user.login != u {
        return false;
      }
    }
    if self.start.is_some_and(|s| task.date < s) {
      return false;
    }
    if self.end.is_some_and(|e| task.date > e) {
      return false;
    }
    true
  }

  /// Human description of the non-date criteria, used in report headers.
  pub fn describe(&self) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(p) = &self.project {
      parts.push(format!("project {p}"));
    }
    if let Some(c) = &self.customer {
      parts.push(format!("customer {c}"));
    }
    if let Some(u) = &self.user {
      parts.push(format!("user {u}"));
    }

    if parts.is_empty() {
      "all tasks".to_string()
    } else {
      parts.join(", ")
    }
  }
}
