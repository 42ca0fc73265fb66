// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build and write the page manifest for runs that write report pages to a directory
// role: persistence/manifest
// inputs: generated_on date, output format, base_dir, PageEntry[]
// outputs: manifest.json file written under base_dir
// side_effects: Writes to filesystem
// invariants:
// - manifest contains pages[] in generation order (summary page before its detail pages)
// - file paths in entries are relative to base_dir
// - parent is null for top-level pages and the parent page identifier otherwise
// errors: IO errors surfaced with full path context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::render::OutputFormat;

/// Helper to build and write the manifest listing every written page.
pub struct PageManifest {
  value: serde_json::Value,
}

impl PageManifest {
  pub fn new(generated_on: NaiveDate, format: OutputFormat) -> Self {
    let v = serde_json::json!({
      "generated_on": generated_on.format("%Y-%m-%d").to_string(),
      "format": format,
      "pages": [],
    });
    Self { value: v }
  }

  pub fn push_page(&mut self, entry: &PageEntry) {
    let page = serde_json::json!({
      "identifier": entry.identifier,
      "header": entry.header,
      "parent": entry.parent,
      "file": entry.file,
    });
    if let Some(pages) = self.value["pages"].as_array_mut() {
      pages.push(page);
    }
  }

  pub fn write_to(&self, base_dir: &str) -> Result<std::path::PathBuf> {
    let path = std::path::Path::new(base_dir).join("manifest.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&self.value)?)
      .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
  }
}

pub struct PageEntry {
  pub identifier: String,
  pub header: String,
  pub parent: Option<String>,
  pub file: String,
}

/// Build and write a page manifest given pre-computed entries.
pub fn write_page_manifest(
  generated_on: NaiveDate,
  format: OutputFormat,
  base_dir: &str,
  entries: &[PageEntry],
) -> Result<std::path::PathBuf> {
  let mut manifest = PageManifest::new(generated_on, format);
  for e in entries {
    manifest.push_page(e);
  }
  manifest.write_to(base_dir)
}
