//! Cross-report hyperlinks for wiki pages.
//!
//! A report body that mentions another report's period label (`2023-W05`)
//! followed by a non-word character gets that mention turned into a
//! `[[Identifier][label]]` link to the other page.

use regex::Regex;

/// A page that other pages may link to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
  pub label: String,
  pub identifier: String,
}

/// Rewrite every `label` + non-word character into a link, keeping the trailing character.
pub fn link_reports(body: &str, targets: &[LinkTarget]) -> String {
  let mut out = body.to_string();

  for target in targets {
    let pattern = format!(r"{}(\W)", regex::escape(&target.label));
    let re = match Regex::new(&pattern) {
      Ok(re) => re,
      Err(_) => continue,
    };
    let replacement = format!(
      "[[{}][{}]]${{1}}",
      target.identifier.replace('$', "$$"),
      target.label.replace('$', "$$")
    );
    out = re.replace_all(&out, replacement.as_str()).into_owned();
  }

  out
}
