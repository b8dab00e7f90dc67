// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Assemble the BurnupModel (origin, sprint history, projection) and derive new models from it
// role: model/builder
// inputs: BuildBurnupInput (raw issues, ISO dates, FTE, sprint length) and an explicit "now"
// outputs: Fresh BurnupModel values; re-parameterized and scope-overridden copies
// invariants:
// - Pure: no clock access, no shared state; same inputs + same now => same model
// - Missing/invalid target date short-circuits to an empty model with has_signal = false
// - with_fte never touches origin or sprint buckets and is a no-op without a velocity signal
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::{BurnupModel, FteScenario, Projection, RawIssue, SprintSummary};
use crate::normalize::normalize_all;
use crate::origin::derive_origin;
use crate::projection::{forecast_completion, project, ProjectionParams};
use crate::sprints::{build_sprints, current_sprint, latest_scope, target_scope};
use crate::util::{floor_to_epoch_day, iso_date, parse_opt_date_ms, DAY_MS};

pub const DEFAULT_SPRINT_LENGTH_DAYS: u32 = 14;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildBurnupInput {
  #[serde(default)]
  pub stories: Vec<RawIssue>,
  /// Fallback cadence start, only used when nothing has been completed yet.
  #[serde(rename = "sprintStartISO")]
  pub sprint_start_iso: Option<String>,
  #[serde(rename = "devCompletionISO")]
  pub dev_completion_iso: Option<String>,
  #[serde(rename = "sprintFTE", default)]
  pub sprint_fte: f64,
  #[serde(rename = "todayISO")]
  pub today_iso: Option<String>,
  pub sprint_length_days: Option<u32>,
}

pub fn sanitize_fte(fte: f64) -> f64 {
  if fte.is_finite() && fte > 0.0 {
    fte
  } else {
    0.0
  }
}

fn sprint_length_days(input: &BuildBurnupInput) -> u32 {
  match input.sprint_length_days {
    Some(0) | None => DEFAULT_SPRINT_LENGTH_DAYS,
    Some(n) => n,
  }
}

/// Rounded day delta between projected completion and target, and whether it is on time.
fn on_track(projection: &Projection, target_ms: Option<i64>) -> (Option<bool>, Option<i64>) {
  match (projection.projected_completion_ms, target_ms) {
    (Some(p), Some(t)) => {
      // half days round toward +inf, so -3.5 becomes -3
      let days = ((p - t) as f64 / DAY_MS as f64 + 0.5).floor() as i64;
      (Some(days <= 0), Some(days))
    }
    _ => (None, None),
  }
}

impl BurnupModel {
  /// Model returned when no usable target date was supplied.
  pub fn empty(sprint_length_days: u32, fte: f64, today_ms: i64) -> Self {
    Self {
      sprint_length_days,
      sprint_length_ms: i64::from(sprint_length_days) * DAY_MS,
      fte,
      origin_ms: today_ms,
      origin_date: iso_date(today_ms),
      target_date_ms: None,
      target_date: None,
      target_scope: 0,
      latest_scope: 0,
      today_ms,
      today_date: iso_date(today_ms),
      current_sprint: None,
      story_count: 0,
      cancelled_count: 0,
      has_any_done: false,
      sprints: Vec::new(),
      projection: Projection::default(),
      is_on_track: None,
      projected_days_vs_target: None,
      scope_override: None,
    }
  }

  fn refresh_on_track(&mut self) {
    let (is_on_track, days) = on_track(&self.projection, self.target_date_ms);
    self.is_on_track = is_on_track;
    self.projected_days_vs_target = days;
  }
}

pub fn build_burnup_model(input: &BuildBurnupInput, now: DateTime<Utc>) -> BurnupModel {
  // Phase 1: resolve scalar inputs
  let today_ms = parse_opt_date_ms(input.today_iso.as_deref())
    .unwrap_or_else(|| floor_to_epoch_day(now.timestamp_millis()));
  let len_days = sprint_length_days(input);
  let len_ms = i64::from(len_days) * DAY_MS;
  let fte = sanitize_fte(input.sprint_fte);

  let target_ms = match parse_opt_date_ms(input.dev_completion_iso.as_deref()) {
    Some(t) => t,
    None => {
      info!("no valid target date; returning empty burn-up model");
      return BurnupModel::empty(len_days, fte, today_ms);
    }
  };

  // Phase 2: normalize and anchor the cadence
  let issues = normalize_all(&input.stories);
  let fallback_ms = parse_opt_date_ms(input.sprint_start_iso.as_deref());
  let origin = derive_origin(&issues, len_days, fallback_ms, today_ms);

  // Phase 3: sprint history
  let sprints = build_sprints(&issues, origin.origin_ms, len_ms, today_ms, Some(target_ms));
  let latest = latest_scope(&sprints);
  let target = target_scope(&sprints, target_ms);

  // Phase 4: projection
  let projection = project(
    &sprints,
    ProjectionParams { latest_scope: latest, target_scope: target, target_ms, sprint_length_ms: len_ms, fte },
  );

  let cancelled_count = issues.iter().filter(|i| i.is_cancelled).count() as u32;
  let mut model = BurnupModel {
    sprint_length_days: len_days,
    sprint_length_ms: len_ms,
    fte,
    origin_ms: origin.origin_ms,
    origin_date: iso_date(origin.origin_ms),
    target_date_ms: Some(target_ms),
    target_date: Some(iso_date(target_ms)),
    target_scope: target,
    latest_scope: latest,
    today_ms,
    today_date: iso_date(today_ms),
    current_sprint: current_sprint(origin.origin_ms, len_ms, today_ms),
    story_count: issues.len() as u32 - cancelled_count,
    cancelled_count,
    has_any_done: issues.iter().any(|i| i.is_done && !i.is_cancelled),
    sprints,
    projection,
    is_on_track: None,
    projected_days_vs_target: None,
    scope_override: None,
  };
  model.refresh_on_track();

  debug!(
    origin = %model.origin_date,
    origin_source = ?origin.source,
    sprints = model.sprints.len(),
    latest_scope = model.latest_scope,
    has_signal = model.projection.has_signal,
    "built burn-up model"
  );
  model
}

/// Recompute only the completion forecast for a new FTE value.
///
/// Sprint buckets, origin and the velocity-per-FTE signal are reused as-is.
/// Returns an unchanged copy when the model carries no usable velocity signal.
pub fn with_fte(model: &BurnupModel, fte: f64) -> BurnupModel {
  let p = &model.projection;
  let avg = match p.avg_velocity_per_fte {
    Some(v) if p.has_signal && v > 0.0 => v,
    _ => return model.clone(),
  };
  let (anchor_ms, anchor_done) = match (p.from_time_ms, p.from_done) {
    (Some(t), Some(d)) => (t, d),
    _ => return model.clone(),
  };

  let fte = sanitize_fte(fte);
  let remaining = model.latest_scope.saturating_sub(anchor_done);
  let forecast = forecast_completion(anchor_ms, remaining, avg, fte, model.sprint_length_ms);

  let mut next = model.clone();
  next.fte = fte;
  forecast.apply_to(&mut next.projection);
  next.refresh_on_track();
  next
}

/// Forecasts for several hypothetical FTE values, via the fast path.
pub fn fte_scenarios(model: &BurnupModel, ftes: &[f64]) -> Vec<FteScenario> {
  ftes
    .iter()
    .map(|&f| {
      let m = with_fte(model, f);
      FteScenario { fte: sanitize_fte(f), ..FteScenario::from_model(&m) }
    })
    .collect()
}

/// Replace the scope of every not-yet-closed sprint with a planned total.
///
/// Closed sprints keep their observed history. The sequence is rebuilt rather
/// than mutated and the projection is re-run against it.
pub fn with_scope_override(model: &BurnupModel, total_scope: u32) -> BurnupModel {
  let mut sprints: Vec<SprintSummary> = Vec::with_capacity(model.sprints.len());
  let mut prev_scope = 0u32;
  let mut prev_done = 0u32;

  for (i, s) in model.sprints.iter().enumerate() {
    let scope_at_end = if s.is_closed { s.scope_at_end } else { total_scope };
    let cumulative_done_at_end = s.cumulative_done_at_end.min(scope_at_end);
    let (scope_at_start, done_this_sprint) = if i == 0 {
      (0, cumulative_done_at_end)
    } else {
      (prev_scope, cumulative_done_at_end.saturating_sub(prev_done))
    };
    sprints.push(SprintSummary {
      scope_at_start,
      scope_at_end,
      done_this_sprint,
      cumulative_done_at_end,
      ..s.clone()
    });
    prev_scope = scope_at_end;
    prev_done = cumulative_done_at_end;
  }

  let mut next = model.clone();
  next.scope_override = Some(total_scope);

  let target_ms = match model.target_date_ms {
    Some(t) => t,
    None => return next,
  };

  next.latest_scope = total_scope;
  next.target_scope = total_scope;
  next.projection = project(
    &sprints,
    ProjectionParams {
      latest_scope: total_scope,
      target_scope: total_scope,
      target_ms,
      sprint_length_ms: model.sprint_length_ms,
      fte: model.fte,
    },
  );
  next.sprints = sprints;
  next.refresh_on_track();
  next
}
