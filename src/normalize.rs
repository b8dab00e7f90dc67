// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Convert raw tracker issues into canonical {created_at, resolved_at, is_done, is_cancelled} facts
// role: normalization
// inputs: RawIssue slices
// outputs: NormalizedIssue values; issues without a parseable creation date are dropped
// invariants:
// - is_done implies resolved_at.is_some() and !is_cancelled
// - done requires resolution AND not cancelled AND (category Done OR status text DONE / "DONE ...")
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::model::{NormalizedIssue, RawIssue, StatusCategory};
use crate::util::parse_opt_date_ms;

static RE_CANCELLED: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?i)\b(cancel+ed|cancel|withdrawn|won'?t\s+do|abandoned|rejected|duplicate)\b").unwrap()
});

pub fn is_cancelled_status(status: Option<&str>) -> bool {
  status.map(|s| RE_CANCELLED.is_match(s)).unwrap_or(false)
}

fn is_done_text(status: Option<&str>) -> bool {
  match status {
    Some(s) => {
      let upper = s.trim().to_uppercase();
      upper == "DONE" || upper.starts_with("DONE ")
    }
    None => false,
  }
}

/// Normalize a single issue; `None` when its creation date is missing or malformed.
pub fn normalize_issue(raw: &RawIssue) -> Option<NormalizedIssue> {
  let created_at = parse_opt_date_ms(raw.created.as_deref())?;
  let resolved_at = parse_opt_date_ms(raw.resolved.as_deref());
  let status = raw.status.as_deref();

  let is_cancelled = is_cancelled_status(status);
  let category_done = raw.status_category == Some(StatusCategory::Done);
  let is_done = resolved_at.is_some() && !is_cancelled && (category_done || is_done_text(status));

  Some(NormalizedIssue { created_at, resolved_at, is_done, is_cancelled })
}

pub fn normalize_all(raw: &[RawIssue]) -> Vec<NormalizedIssue> {
  let out: Vec<NormalizedIssue> = raw.iter().filter_map(normalize_issue).collect();

  if out.len() < raw.len() {
    debug!(dropped = raw.len() - out.len(), "dropped issues without a parseable creation date");
  }

  out
}
