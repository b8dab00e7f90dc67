// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Derive the sprint cadence origin (sprint 0 start) from noisy issue history
// role: model/origin
// inputs: Normalized issues, sprint length in days, optional fallback start, today
// outputs: Epoch-day aligned origin timestamp and the branch that produced it
// invariants:
// - The earliest valid completion is treated as the END of sprint 0
// - At least one working day is always subtracted from that completion
// - Result is floored to the epoch day; falls back to today when nothing else applies
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use tracing::debug;

use crate::model::NormalizedIssue;
use crate::util::{floor_to_epoch_day, subtract_working_days};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginSource {
  /// No usable issues; caller fallback (or today)
  Fallback,
  /// Back-computed from the earliest completion
  EarliestDone,
  /// No completions yet; earliest creation (or fallback when earlier)
  EarliestCreated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
  pub origin_ms: i64,
  pub source: OriginSource,
}

/// Working days an organisation staffs within a calendar sprint (10 for 14 days).
pub fn working_days_in_sprint(sprint_length_days: u32) -> u32 {
  let wd = (f64::from(sprint_length_days) * 5.0 / 7.0).round() as u32;
  wd.max(1)
}

pub fn derive_origin(
  issues: &[NormalizedIssue],
  sprint_length_days: u32,
  fallback_start_ms: Option<i64>,
  today_ms: i64,
) -> Origin {
  if issues.is_empty() {
    let origin_ms = floor_to_epoch_day(fallback_start_ms.unwrap_or(today_ms));
    debug!(origin_ms, "origin from fallback start (no issues)");
    return Origin { origin_ms, source: OriginSource::Fallback };
  }

  let earliest_done = issues
    .iter()
    .filter(|i| i.is_done && !i.is_cancelled)
    .filter_map(|i| i.resolved_at)
    .min();

  if let Some(done_at) = earliest_done {
    let back = working_days_in_sprint(sprint_length_days);
    let origin_ms = floor_to_epoch_day(subtract_working_days(done_at, back));
    debug!(origin_ms, earliest_done_ms = done_at, working_days = back, "origin from earliest completion");
    return Origin { origin_ms, source: OriginSource::EarliestDone };
  }

  // Non-empty by the guard above
  let earliest_created = issues.iter().map(|i| i.created_at).min().unwrap_or(today_ms);
  let start = match fallback_start_ms {
    Some(fb) => fb.min(earliest_created),
    None => earliest_created,
  };
  let origin_ms = floor_to_epoch_day(start);
  debug!(origin_ms, "origin from earliest creation (no completions yet)");

  Origin { origin_ms, source: OriginSource::EarliestCreated }
}
