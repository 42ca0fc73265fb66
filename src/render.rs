// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Turn report building blocks (headers, tables, aligned lists) into plain text or wiki markup
// role: rendering/backends
// inputs: Rows of string cells, (label, text) pairs, header strings
// outputs: Fragments concatenated by flatten() into one report body
// invariants:
// - plain tables pad/truncate every cell to its column width, two spaces between columns
// - plain aligned lists wrap to 80 columns without breaking words; continuation lines start in the colon column
// - wiki tables without headers and with at least PAGE_ROWS rows are chunked and transposed
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Total line width for plain aligned lists.
pub const LINE_WIDTH: usize = 80;

/// Rows per chunk when paginating long wiki tables.
pub const PAGE_ROWS: usize = 10;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
  Plain,
  Wiki,
}

impl OutputFormat {
  pub fn formatter(self) -> Box<dyn Formatter> {
    match self {
      OutputFormat::Plain => Box::new(PlainFormatter::default()),
      OutputFormat::Wiki => Box::new(WikiFormatter::default()),
    }
  }

  pub fn file_extension(self) -> &'static str {
    match self {
      OutputFormat::Plain => "txt",
      OutputFormat::Wiki => "twiki",
    }
  }
}

/// Accumulates report fragments in emission order.
pub trait Formatter {
  fn header(&mut self, text: &str);
  fn section_header(&mut self, text: &str);
  fn table(&mut self, rows: &[Vec<String>], has_headers: bool);
  fn aligned_list(&mut self, pairs: &[(String, String)]);
  fn large_text(&mut self, text: &str);
  fn flatten(&self) -> String;
}

#[derive(Debug, Default)]
pub struct PlainFormatter {
  fragments: Vec<String>,
}

impl Formatter for PlainFormatter {
  fn header(&mut self, text: &str) {
    self.fragments.push(format!("\n{text}\n"));
  }

  fn section_header(&mut self, text: &str) {
    self.fragments.push(format!("\n{text}\n"));
  }

  fn table(&mut self, rows: &[Vec<String>], _has_headers: bool) {
    if rows.is_empty() {
      return;
    }

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
      .map(|c| {
        rows
          .iter()
          .filter_map(|r| r.get(c))
          .map(|s| s.chars().count())
          .max()
          .unwrap_or(0)
      })
      .collect();

    for row in rows {
      let cells: Vec<String> = row.iter().zip(&widths).map(|(cell, &w)| fit(cell, w)).collect();
      self.fragments.push(format!("{}\n", cells.join("  ")));
    }
  }

  fn aligned_list(&mut self, pairs: &[(String, String)]) {
    let width = pairs.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let text_width = LINE_WIDTH.saturating_sub(width + 2).max(1);
    let continuation = format!("\n{}", " ".repeat(width));

    for (label, text) in pairs {
      let body = wrap(text, text_width).join(&continuation);
      self.fragments.push(format!("{label:>width$}: {body}\n"));
    }
  }

  fn large_text(&mut self, text: &str) {
    self.fragments.push(format!("{text}\n"));
  }

  fn flatten(&self) -> String {
    self.fragments.concat()
  }
}

#[derive(Debug, Default)]
pub struct WikiFormatter {
  fragments: Vec<String>,
}

impl WikiFormatter {
  fn row(&mut self, cells: &[String], emphasis: bool) {
    let cells: Vec<String> = cells
      .iter()
      .map(|c| if emphasis && !c.is_empty() { format!("*{c}*") } else { c.clone() })
      .collect();
    self.fragments.push(format!("| {} |\n", cells.join(" | ")));
  }
}

impl Formatter for WikiFormatter {
  fn header(&mut self, text: &str) {
    self.fragments.push(format!("\n---++{text}\n"));
  }

  fn section_header(&mut self, text: &str) {
    self.fragments.push(format!("\n---++++{text}\n"));
  }

  fn table(&mut self, rows: &[Vec<String>], has_headers: bool) {
    if !has_headers && rows.len() >= PAGE_ROWS {
      for wide in paginate(rows, PAGE_ROWS) {
        self.row(&wide, false);
      }
      return;
    }

    for (i, row) in rows.iter().enumerate() {
      self.row(row, has_headers && i == 0);
    }
  }

  fn aligned_list(&mut self, pairs: &[(String, String)]) {
    for (label, text) in pairs {
      self.fragments.push(format!("   * *{label}* - {text}\n"));
    }
  }

  fn large_text(&mut self, text: &str) {
    self.fragments.push(format!("\n<font size=\"+2\">{text}</font>\n"));
  }

  fn flatten(&self) -> String {
    self.fragments.concat()
  }
}

/// Reshape a tall table into at most `page` wide rows.
///
/// Rows are cut into consecutive chunks of `page`; output row `j` is row `j` of
/// every chunk laid side by side. Short chunks are padded with rows of empty
/// cells as wide as the first input row.
pub fn paginate(rows: &[Vec<String>], page: usize) -> Vec<Vec<String>> {
  if rows.is_empty() || page == 0 {
    return Vec::new();
  }

  let pad = vec![String::new(); rows[0].len()];
  let chunks: Vec<&[Vec<String>]> = rows.chunks(page).collect();
  let depth = chunks.iter().map(|c| c.len()).max().unwrap_or(0);

  (0..depth)
    .map(|j| {
      chunks
        .iter()
        .flat_map(|chunk| chunk.get(j).unwrap_or(&pad).iter().cloned())
        .collect()
    })
    .collect()
}

/// Left-justify `cell` in exactly `width` characters, truncating when longer.
fn fit(cell: &str, width: usize) -> String {
  let clipped: String = cell.chars().take(width).collect();
  format!("{clipped:<width$}")
}

/// Greedy word wrap; words longer than `width` (URLs, paths) get a line of their own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
  let mut lines: Vec<String> = Vec::new();
  let mut current = String::new();

  for word in text.split_whitespace() {
    if current.is_empty() {
      current.push_str(word);
    } else if current.chars().count() + 1 + word.chars().count() <= width {
      current.push(' ');
      current.push_str(word);
    } else {
      lines.push(std::mem::take(&mut current));
      current.push_str(word);
    }
  }

  if !current.is_empty() {
    lines.push(current);
  }
  lines
}
