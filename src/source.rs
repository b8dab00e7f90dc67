// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Load an already-paginated issue-tracker export (file or stdin) into RawIssue values
// role: boundary/source
// inputs: Path or "-" for stdin; JSON as flat issue array, one search page, or an array of search pages
// outputs: Vec<RawIssue> in export order
// side_effects: Reads the filesystem or stdin
// invariants:
// - Unknown top-level shapes are an error; malformed individual issues are passed through for the normalizer to drop
// - Pages are concatenated in the order given
// errors: IO and JSON parse errors carry the source path as context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Read;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::ext::serde_json::JsonFetch;
use crate::model::{RawIssue, StatusCategory};

pub fn read_source(path: &str) -> Result<String> {
  if path == "-" {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf).context("reading issue export from stdin")?;
    return Ok(buf);
  }
  std::fs::read_to_string(path).with_context(|| format!("reading issue export {}", path))
}

pub fn load_issues(path: &str) -> Result<Vec<RawIssue>> {
  let text = read_source(path)?;
  let value: Value = serde_json::from_str(&text).with_context(|| format!("parsing issue export {} as JSON", path))?;
  issues_from_json(&value).with_context(|| format!("reading issues from {}", path))
}

fn is_search_page(v: &Value) -> bool {
  v.get("issues").map(Value::is_array).unwrap_or(false)
}

/// Map one exported issue, accepting both nested tracker records and flat records.
pub fn issue_from_json(v: &Value) -> RawIssue {
  RawIssue {
    key: v.fetch("key").to::<String>(),
    created: v.fetch_first(&["fields.created", "created", "createdAt"]).to::<String>(),
    resolved: v
      .fetch_first(&["fields.resolutiondate", "resolved", "resolutiondate", "resolutionDate", "resolvedAt"])
      .to::<String>(),
    status_category: v
      .fetch_first(&["fields.status.statusCategory.name", "statusCategory"])
      .as_str()
      .map(StatusCategory::from_label),
    status: v.fetch_first(&["fields.status.name", "status"]).to::<String>(),
  }
}

fn page_issues(page: &Value, out: &mut Vec<RawIssue>) {
  if let Some(items) = page.get("issues").and_then(Value::as_array) {
    out.extend(items.iter().map(issue_from_json));
  }
}

pub fn issues_from_json(value: &Value) -> Result<Vec<RawIssue>> {
  let mut out: Vec<RawIssue> = Vec::new();

  match value {
    Value::Array(items) if !items.is_empty() && items.iter().all(is_search_page) => {
      for page in items {
        page_issues(page, &mut out);
      }
      debug!(pages = items.len(), issues = out.len(), "loaded paginated export");

      let expected = items[0].fetch("total").to::<u64>();
      if let Some(total) = expected {
        if (out.len() as u64) < total {
          warn!(total, loaded = out.len(), "export holds fewer issues than the tracker reported");
        }
      }
    }
    Value::Array(items) => {
      out.extend(items.iter().map(issue_from_json));
      debug!(issues = out.len(), "loaded flat issue export");
    }
    Value::Object(_) if is_search_page(value) => {
      page_issues(value, &mut out);
      debug!(issues = out.len(), "loaded single-page export");
    }
    _ => bail!("unrecognised issue export: expected an array of issues or a search response with an `issues` array"),
  }

  Ok(out)
}
