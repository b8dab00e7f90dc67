// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Partition the time axis into fixed-length sprint windows and aggregate scope/done per window
// role: model/bucketing
// inputs: Normalized issues, origin, sprint length, today, optional target date
// outputs: Ordered SprintSummary sequence plus latest/target scope
// invariants:
// - end_at == start_at + sprint_length_ms for every sprint
// - cumulative_done_at_end <= scope_at_end and is non-decreasing
// - cancelled issues count toward neither scope nor done
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use tracing::debug;

use crate::model::{NormalizedIssue, SprintSummary, SprintWindow};

/// Sprints generated past the last relevant date, leaving room for the forecast cone.
pub const HORIZON_OVERSHOOT_SPRINTS: i64 = 6;

/// Latest creation or resolution across all issues, or `origin_ms` when there are none.
pub fn last_relevant_issue_ms(issues: &[NormalizedIssue], origin_ms: i64) -> i64 {
  issues
    .iter()
    .flat_map(|i| std::iter::once(i.created_at).chain(i.resolved_at))
    .max()
    .unwrap_or(origin_ms)
}

pub fn horizon_ms(
  issues: &[NormalizedIssue],
  origin_ms: i64,
  today_ms: i64,
  target_ms: Option<i64>,
  sprint_length_ms: i64,
) -> i64 {
  let last = last_relevant_issue_ms(issues, origin_ms);
  let mut base = today_ms.max(last);
  if let Some(t) = target_ms {
    base = base.max(t);
  }
  base + HORIZON_OVERSHOOT_SPRINTS * sprint_length_ms
}

fn scope_by(issues: &[NormalizedIssue], end_ms: i64) -> u32 {
  issues.iter().filter(|i| !i.is_cancelled && i.created_at < end_ms).count() as u32
}

fn done_by(issues: &[NormalizedIssue], end_ms: i64) -> u32 {
  issues
    .iter()
    .filter(|i| i.is_done && !i.is_cancelled && i.created_at < end_ms)
    .filter(|i| matches!(i.resolved_at, Some(r) if r < end_ms))
    .count() as u32
}

pub fn build_sprints(
  issues: &[NormalizedIssue],
  origin_ms: i64,
  sprint_length_ms: i64,
  today_ms: i64,
  target_ms: Option<i64>,
) -> Vec<SprintSummary> {
  let horizon = horizon_ms(issues, origin_ms, today_ms, target_ms, sprint_length_ms);
  let mut out: Vec<SprintSummary> = Vec::new();
  let mut prev_scope = 0u32;
  let mut prev_done = 0u32;
  let mut index = 0usize;

  loop {
    let start_at = origin_ms + index as i64 * sprint_length_ms;
    if start_at > horizon {
      break;
    }
    let end_at = start_at + sprint_length_ms;

    let scope_at_end = scope_by(issues, end_at);
    let cumulative_done_at_end = done_by(issues, end_at).min(scope_at_end);
    let (scope_at_start, done_this_sprint) = if index == 0 {
      (0, cumulative_done_at_end)
    } else {
      (prev_scope, cumulative_done_at_end.saturating_sub(prev_done))
    };

    out.push(SprintSummary {
      index,
      start_at,
      end_at,
      scope_at_start,
      scope_at_end,
      done_this_sprint,
      cumulative_done_at_end,
      is_closed: end_at <= today_ms,
    });

    prev_scope = scope_at_end;
    prev_done = cumulative_done_at_end;
    index += 1;
  }

  debug!(sprints = out.len(), horizon_ms = horizon, "built sprint history");
  out
}

pub fn latest_scope(sprints: &[SprintSummary]) -> u32 {
  sprints.last().map(|s| s.scope_at_end).unwrap_or(0)
}

/// Scope "as of" the target: the first sprint ending on or after it, else the last sprint.
pub fn target_scope(sprints: &[SprintSummary], target_ms: i64) -> u32 {
  sprints
    .iter()
    .find(|s| s.end_at >= target_ms)
    .or_else(|| sprints.last())
    .map(|s| s.scope_at_end)
    .unwrap_or(0)
}

/// The sprint window containing `today_ms`, or `None` when today precedes the origin.
pub fn current_sprint(origin_ms: i64, sprint_length_ms: i64, today_ms: i64) -> Option<SprintWindow> {
  if today_ms < origin_ms || sprint_length_ms <= 0 {
    return None;
  }
  let index = (today_ms - origin_ms) / sprint_length_ms;
  let start_at = origin_ms + index * sprint_length_ms;
  Some(SprintWindow { index: index as usize, start_at, end_at: start_at + sprint_length_ms })
}
