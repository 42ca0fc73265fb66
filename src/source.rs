// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Task-fetch seam (batched, positional) plus the directory used to resolve search terms into filter criteria
// role: source/integration
// inputs: Ordered TaskFilter slices; JSON task store files; an HTTP base URL
// outputs: Ordered task batches (one per filter); Directory of users/projects/customers
// side_effects: HttpSource performs network calls; MemorySource reads a file once at load
// invariants:
// - fetch_tasks_for_filters returns exactly one batch per filter, in filter order
// - one fetch_tasks_for_filters call is one logical request regardless of filter count
// - ambiguous or unknown search terms are errors that name the candidates
// errors: Fetch and decode failures propagate with context; no retries
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

use crate::model::{Project, TaskFilter, TaskRecord, User};

// --- Trait seam for the task tracker ---
pub trait TaskSource: Send + Sync {
  /// Fetch tasks for every filter in one request; `result[i]` matches `filters[i]`.
  fn fetch_tasks_for_filters(&self, filters: &[TaskFilter]) -> Result<Vec<Vec<TaskRecord>>>;

  /// Known users, projects and customers for resolving search terms.
  fn directory(&self) -> Result<Directory>;
}

/// Explicit lookup tables for entities referenced by filters.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Directory {
  #[serde(default)]
  pub users: Vec<User>,
  #[serde(default)]
  pub projects: Vec<Project>,
}

impl Directory {
  pub fn customers(&self) -> Vec<String> {
    let set: BTreeSet<&String> = self.projects.iter().filter_map(|p| p.customer.as_ref()).collect();
    set.into_iter().cloned().collect()
  }

  pub fn resolve_project(&self, term: &str) -> Result<&Project> {
    pick("project", term, &self.projects, |p| vec![p.name.as_str()], |p| p.name.clone())
  }

  pub fn resolve_customer(&self, term: &str) -> Result<String> {
    let customers = self.customers();
    pick("customer", term, &customers, |c| vec![c.as_str()], |c| c.clone()).cloned()
  }

  pub fn resolve_user(&self, term: &str) -> Result<&User> {
    pick(
      "user",
      term,
      &self.users,
      |u| vec![u.login.as_str(), u.name.as_str()],
      |u| format!("{} ({})", u.login, u),
    )
  }

  /// Build a filter from optional search terms, resolving each to exactly one entity.
  pub fn resolve_filter(&self, project: Option<&str>, customer: Option<&str>, user: Option<&str>) -> Result<TaskFilter> {
    let mut filter = TaskFilter::default();

    if let Some(term) = project {
      let p = self.resolve_project(term)?;
      filter.project = Some(p.name.clone());
    }
    if let Some(term) = customer {
      filter.customer = Some(self.resolve_customer(term)?);
    }
    if let Some(term) = user {
      filter.user = Some(self.resolve_user(term)?.login.clone());
    }

    Ok(filter)
  }
}

/// Exact (case-insensitive) matches win; otherwise a single substring match is accepted.
fn pick<'a, T>(
  kind: &str,
  term: &str,
  items: &'a [T],
  keys: impl Fn(&T) -> Vec<&str>,
  label: impl Fn(&T) -> String,
) -> Result<&'a T> {
  let needle = term.trim().to_lowercase();

  let exact: Vec<&T> = items
    .iter()
    .filter(|it| keys(it).iter().any(|k| k.to_lowercase() == needle))
    .collect();
  if exact.len() == 1 {
    return Ok(exact[0]);
  }

  let candidates: Vec<&T> = if exact.is_empty() {
    items
      .iter()
      .filter(|it| keys(it).iter().any(|k| k.to_lowercase().contains(&needle)))
      .collect()
  } else {
    exact
  };

  match candidates.len() {
    0 => bail!("no {kind} matches \"{term}\""),
    1 => Ok(candidates[0]),
    _ => {
      let names: Vec<String> = candidates.iter().map(|c| format!("  - {}", label(c))).collect();
      bail!(
        "\"{term}\" matches several {kind}s; pass one of these names exactly:\n{}",
        names.join("\n")
      )
    }
  }
}

/// On-disk layout of a task store.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct TaskStore {
  #[serde(default)]
  pub users: Vec<User>,
  #[serde(default)]
  pub projects: Vec<Project>,
  #[serde(default)]
  pub tasks: Vec<TaskRecord>,
}

/// In-memory task store; filters are applied locally.
pub struct MemorySource {
  directory: Directory,
  tasks: Vec<TaskRecord>,
  calls: AtomicUsize,
}

impl MemorySource {
  pub fn new(tasks: Vec<TaskRecord>) -> Self {
    Self::from_store(TaskStore { tasks, ..TaskStore::default() })
  }

  /// Directory entries come from the store and from every task it holds.
  pub fn from_store(store: TaskStore) -> Self {
    let mut users = store.users;
    let mut projects = store.projects;

    for t in &store.tasks {
      if !users.iter().any(|u| u.login == t.user.login) {
        users.push(t.user.clone());
      }
      if !t.project.is_empty() && !projects.iter().any(|p| p.name == t.project) {
        projects.push(Project { name: t.project.clone(), customer: t.customer.clone() });
      }
    }
    users.sort();

    Self {
      directory: Directory { users, projects },
      tasks: store.tasks,
      calls: AtomicUsize::new(0),
    }
  }

  pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let buf = std::fs::read(path).with_context(|| format!("reading task store {}", path.display()))?;
    let store: TaskStore =
      serde_json::from_slice(&buf).with_context(|| format!("parsing task store {}", path.display()))?;
    debug!(path = %path.display(), tasks = store.tasks.len(), "loaded task store");
    Ok(Self::from_store(store))
  }

  /// Number of batched fetches served so far.
  pub fn batch_calls(&self) -> usize {
    self.calls.load(Ordering::Relaxed)
  }
}

impl TaskSource for MemorySource {
  fn fetch_tasks_for_filters(&self, filters: &[TaskFilter]) -> Result<Vec<Vec<TaskRecord>>> {
    self.calls.fetch_add(1, Ordering::Relaxed);
    let out: Vec<Vec<TaskRecord>> = filters
      .iter()
      .map(|f| self.tasks.iter().filter(|t| f.matches(t)).cloned().collect())
      .collect();
    debug!(
      filters = filters.len(),
      tasks = out.iter().map(Vec::len).sum::<usize>(),
      "served batched fetch"
    );
    Ok(out)
  }

  fn directory(&self) -> Result<Directory> {
    Ok(self.directory.clone())
  }
}

/// JSON-over-HTTP task tracker.
///
/// `POST <base>/tasks/batch` with `{"filters": [...]}` answers `[[task, ...], ...]`;
/// `GET <base>/directory` answers a `Directory`.
pub struct HttpSource {
  base_url: String,
  agent: ureq::Agent,
}

impl HttpSource {
  pub fn new(base_url: &str) -> Self {
    let agent = ureq::AgentBuilder::new()
      .timeout(std::time::Duration::from_secs(60))
      .user_agent("weekly-hours-report")
      .build();
    Self { base_url: base_url.trim_end_matches('/').to_string(), agent }
  }

  fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.base_url, path.trim_start_matches('/'))
  }
}

impl TaskSource for HttpSource {
  fn fetch_tasks_for_filters(&self, filters: &[TaskFilter]) -> Result<Vec<Vec<TaskRecord>>> {
    if filters.is_empty() {
      return Ok(Vec::new());
    }

    let url = self.endpoint("tasks/batch");
    debug!(%url, filters = filters.len(), "requesting task batch");

    let resp = self
      .agent
      .post(&url)
      .set("Accept", "application/json")
      .send_json(serde_json::json!({ "filters": filters }))
      .map_err(|e| anyhow!("POST {url} failed: {e}"))?;

    let batches: Vec<Vec<TaskRecord>> = resp.into_json().with_context(|| format!("decoding response from {url}"))?;

    if batches.len() != filters.len() {
      bail!("{url} answered {} task batches for {} filters", batches.len(), filters.len());
    }

    Ok(batches)
  }

  fn directory(&self) -> Result<Directory> {
    let url = self.endpoint("directory");
    let resp = self
      .agent
      .get(&url)
      .set("Accept", "application/json")
      .call()
      .map_err(|e| anyhow!("GET {url} failed: {e}"))?;

    resp.into_json().with_context(|| format!("decoding response from {url}"))
  }
}
