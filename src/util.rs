// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for paths, "today" overrides, identifier/whitespace text helpers, and man page rendering
// role: utilities/helpers
// inputs: Various primitives; NaiveDate; paths; clap CommandFactory
// outputs: Canonicalized paths, effective dates, cleaned strings, directories ensured, man page text
// side_effects: prepare_out_dir creates directories
// invariants:
// - alphanumeric keeps only ASCII letters and digits, in order
// - squash_whitespace leaves no leading, trailing or repeated whitespace
// - prepare_out_dir returns an existing directory
// errors: IO errors bubble with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::CommandFactory;
use once_cell::sync::Lazy;
use regex::Regex;

pub fn canonicalize_lossy<P: AsRef<Path>>(p: P) -> String {
  let p = p.as_ref();
  let pb: PathBuf = match std::fs::canonicalize(p) {
    Ok(x) => x,
    Err(_) => match std::env::current_dir() {
      Ok(cwd) => cwd.join(p),
      Err(_) => PathBuf::from(p),
    },
  };
  pb.to_string_lossy().to_string()
}

/// Parse a `--today-override` value (`YYYY-MM-DD`).
pub fn parse_today_override(s: Option<&str>) -> Result<Option<NaiveDate>> {
  s.map(|raw| {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").with_context(|| format!("invalid --today-override \"{raw}\""))
  })
  .transpose()
}

/// Returns the effective "today" given an optional override.
///
/// Centralizes test determinism without sprinkling `Local::now()` through the
/// week parsing code.
pub fn effective_today(override_today: Option<NaiveDate>) -> NaiveDate {
  override_today.unwrap_or_else(|| Local::now().date_naive())
}

/// Create the output directory if needed and return its absolute path.
pub fn prepare_out_dir(out: &str) -> Result<String> {
  std::fs::create_dir_all(out).with_context(|| format!("creating output directory {out}"))?;
  Ok(canonicalize_lossy(out))
}

/// Keep only ASCII letters and digits.
pub fn alphanumeric(text: &str) -> String {
  text.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Collapse every whitespace run to one space and trim the ends.
pub fn squash_whitespace(text: &str) -> String {
  static RE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));
  RE_SPACE.replace_all(text.trim(), " ").into_owned()
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
