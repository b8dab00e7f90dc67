// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Velocity-based completion forecast anchored at the last closed sprint
// role: model/projection
// inputs: Sprint history, latest/target scope, target date, sprint length, FTE multiplier
// outputs: Projection (anchor, remaining, velocity signal, required FTE, central/early/late completion)
// invariants:
// - Partial fill: anchor and remaining fields survive even when has_signal is false
// - Velocity-per-FTE uses at most 2 non-zero samples within an 8-sprint lookback
// - FTE is floored at 0.1 before any division or scaling; non-finite results become None
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{TimeZone, Utc};
use tracing::debug;

use crate::model::{Projection, SprintSummary};

pub const LOOKBACK_SPRINTS: usize = 8;
pub const MAX_VELOCITY_SAMPLES: usize = 2;
pub const RECENT_VELOCITY_SPRINTS: usize = 2;
pub const MIN_FTE: f64 = 0.1;
pub const OPTIMISTIC_FACTOR: f64 = 1.2;
pub const PESSIMISTIC_FACTOR: f64 = 0.8;

pub fn effective_fte(fte: f64) -> f64 {
  if fte.is_finite() {
    fte.max(MIN_FTE)
  } else {
    MIN_FTE
  }
}

fn finite(v: f64) -> Option<f64> {
  v.is_finite().then_some(v)
}

/// `anchor + sprints * len`, or `None` once the result leaves the representable date range.
fn offset_ms(anchor_ms: i64, sprints: f64, sprint_length_ms: i64) -> Option<i64> {
  let v = (anchor_ms as f64 + sprints * sprint_length_ms as f64).round();
  if !v.is_finite() || v < i64::MIN as f64 || v >= i64::MAX as f64 {
    return None;
  }
  let ms = v as i64;
  Utc.timestamp_millis_opt(ms).single().map(|_| ms)
}

/// Completion forecast for one velocity setting (steps shared by build and re-parameterize).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Forecast {
  pub projected_velocity: Option<f64>,
  pub projected_sprints: Option<f64>,
  pub completion_ms: Option<i64>,
  pub early_ms: Option<i64>,
  pub late_ms: Option<i64>,
}

impl Forecast {
  pub fn apply_to(&self, p: &mut Projection) {
    p.projected_velocity = self.projected_velocity;
    p.projected_sprints = self.projected_sprints;
    p.projected_completion_ms = self.completion_ms;
    p.projected_completion_early_ms = self.early_ms;
    p.projected_completion_late_ms = self.late_ms;
  }
}

pub fn forecast_completion(
  anchor_ms: i64,
  remaining: u32,
  avg_velocity_per_fte: f64,
  fte: f64,
  sprint_length_ms: i64,
) -> Forecast {
  let velocity = avg_velocity_per_fte * effective_fte(fte);

  if !(velocity.is_finite() && velocity > 0.0) {
    return Forecast::default();
  }

  if remaining == 0 {
    return Forecast {
      projected_velocity: Some(velocity),
      projected_sprints: Some(0.0),
      completion_ms: Some(anchor_ms),
      early_ms: Some(anchor_ms),
      late_ms: Some(anchor_ms),
    };
  }

  let remaining = f64::from(remaining);
  let projected_sprints = remaining / velocity;
  let completion_ms = match offset_ms(anchor_ms, projected_sprints, sprint_length_ms) {
    Some(ms) => ms,
    None => return Forecast::default(),
  };

  let band = |factor: f64| {
    let v = velocity * factor;
    if v.is_finite() && v > 0.0 {
      offset_ms(anchor_ms, remaining / v, sprint_length_ms).unwrap_or(completion_ms)
    } else {
      completion_ms
    }
  };

  Forecast {
    projected_velocity: Some(velocity),
    projected_sprints: Some(projected_sprints),
    completion_ms: Some(completion_ms),
    early_ms: Some(band(OPTIMISTIC_FACTOR)),
    late_ms: Some(band(PESSIMISTIC_FACTOR)),
  }
}

/// Mean `done_this_sprint` over the most recent closed sprints ending at the anchor.
fn recent_velocity(sprints: &[SprintSummary], anchor_index: usize) -> Option<f64> {
  let window: Vec<u32> = sprints[..=anchor_index]
    .iter()
    .rev()
    .filter(|s| s.is_closed)
    .take(RECENT_VELOCITY_SPRINTS)
    .map(|s| s.done_this_sprint)
    .collect();

  if window.is_empty() {
    return None;
  }
  let sum: u32 = window.iter().sum();
  Some(f64::from(sum) / window.len() as f64)
}

/// Collect up to two per-FTE samples from non-zero closed sprints, newest first.
///
/// Both stop conditions matter: the lookback cap and the sample count.
pub fn velocity_samples(sprints: &[SprintSummary], anchor_index: usize, fte: f64) -> Vec<f64> {
  let fte = effective_fte(fte);
  let mut samples: Vec<f64> = Vec::with_capacity(MAX_VELOCITY_SAMPLES);
  let mut visited = 0usize;
  let mut i = anchor_index as isize;

  while i >= 0 && visited < LOOKBACK_SPRINTS {
    let s = &sprints[i as usize];
    visited += 1;
    i -= 1;

    if !s.is_closed || s.done_this_sprint == 0 {
      continue;
    }
    samples.push(f64::from(s.done_this_sprint) / fte);
    if samples.len() >= MAX_VELOCITY_SAMPLES {
      break;
    }
  }

  samples
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectionParams {
  pub latest_scope: u32,
  pub target_scope: u32,
  pub target_ms: i64,
  pub sprint_length_ms: i64,
  pub fte: f64,
}

pub fn project(sprints: &[SprintSummary], params: ProjectionParams) -> Projection {
  let mut p = Projection::default();

  let anchor_index = match sprints.iter().rposition(|s| s.is_closed) {
    Some(i) => i,
    None => {
      debug!(sprints = sprints.len(), "no closed sprint; projection has no signal");
      return p;
    }
  };

  let anchor = &sprints[anchor_index];
  let anchor_ms = anchor.end_at;
  let anchor_done = anchor.cumulative_done_at_end;
  let len_ms = params.sprint_length_ms;

  let remaining = params.latest_scope.saturating_sub(anchor_done);
  let remaining_to_target = params.target_scope.saturating_sub(anchor_done);

  p.from_sprint_index = Some(anchor_index);
  p.from_time_ms = Some(anchor_ms);
  p.from_done = Some(anchor_done);
  p.remaining_stories_from_anchor = Some(remaining);
  p.remaining_to_target = Some(remaining_to_target);

  let sprints_to_target = (params.target_ms > anchor_ms && len_ms > 0)
    .then(|| (params.target_ms - anchor_ms) as f64 / len_ms as f64);

  if let Some(sprints_float) = sprints_to_target {
    p.sprints_remaining_to_target = Some(sprints_float.ceil() as u32);
    p.required_velocity_to_hit_target = if remaining_to_target == 0 {
      Some(0.0)
    } else {
      finite(f64::from(remaining_to_target) / sprints_float)
    };
  }

  p.recent_velocity = recent_velocity(sprints, anchor_index);

  let samples = velocity_samples(sprints, anchor_index, params.fte);
  if samples.is_empty() {
    debug!(anchor_index, "no non-zero closed sprint within lookback; projection has no signal");
    return p;
  }
  let avg = samples.iter().sum::<f64>() / samples.len() as f64;
  p.avg_velocity_per_fte = finite(avg);
  p.velocity_samples = samples;
  p.has_signal = true;

  if remaining_to_target == 0 {
    p.required_fte_to_hit_target = Some(0.0);
    p.suggested_fte_max = finite(params.fte + 1.0);
  } else if let (Some(sprints_float), true) = (sprints_to_target, avg > 0.0) {
    let required_velocity = f64::from(remaining_to_target) / sprints_float;
    let required_fte = finite(required_velocity / avg);
    p.required_fte_to_hit_target = required_fte;
    p.suggested_fte_max = required_fte.map(|f| f + 1.0);
  }

  forecast_completion(anchor_ms, remaining, avg, params.fte, len_ms).apply_to(&mut p);
  p
}
