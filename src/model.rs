// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the burn-up data model (raw issues, normalized issues, sprint summaries, projection, model root)
// role: model/types
// outputs: Serializable value types with stable camelCase field names; no behavior beyond constructors
// invariants: Timestamps are epoch-day aligned i64 milliseconds (UTC); non-finite numbers never appear (None instead)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Serialize};

/// Tracker status category as reported alongside the free-text status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StatusCategory {
  #[serde(rename = "To Do", alias = "new")]
  ToDo,
  #[serde(rename = "In Progress", alias = "indeterminate")]
  InProgress,
  #[serde(rename = "Done", alias = "done")]
  Done,
  #[default]
  #[serde(other)]
  Unknown,
}

impl StatusCategory {
  /// Lenient mapping from a tracker category label or key.
  pub fn from_label(label: &str) -> Self {
    match label.trim().to_ascii_lowercase().as_str() {
      "to do" | "todo" | "new" => StatusCategory::ToDo,
      "in progress" | "indeterminate" => StatusCategory::InProgress,
      "done" => StatusCategory::Done,
      _ => StatusCategory::Unknown,
    }
  }
}

/// A work item as exported by the issue tracker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIssue {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub key: Option<String>,
  #[serde(default, alias = "createdAt")]
  pub created: Option<String>,
  #[serde(default, alias = "resolutiondate", alias = "resolvedAt", alias = "resolutionDate")]
  pub resolved: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status_category: Option<StatusCategory>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
}

/// Canonical per-issue facts used by the bucketizer.
///
/// `is_done` implies `resolved_at.is_some()` and `!is_cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedIssue {
  pub created_at: i64,
  pub resolved_at: Option<i64>,
  pub is_done: bool,
  pub is_cancelled: bool,
}

/// One fixed-length sprint window `[start_at, end_at)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintSummary {
  pub index: usize,
  pub start_at: i64,
  pub end_at: i64,
  pub scope_at_start: u32,
  pub scope_at_end: u32,
  pub done_this_sprint: u32,
  pub cumulative_done_at_end: u32,
  pub is_closed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintWindow {
  pub index: usize,
  pub start_at: i64,
  pub end_at: i64,
}

/// Forward forecast anchored at the last closed sprint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
  pub has_signal: bool,
  pub from_sprint_index: Option<usize>,
  pub from_time_ms: Option<i64>,
  pub from_done: Option<u32>,
  pub remaining_stories_from_anchor: Option<u32>,
  pub remaining_to_target: Option<u32>,
  pub sprints_remaining_to_target: Option<u32>,
  pub required_velocity_to_hit_target: Option<f64>,
  pub recent_velocity: Option<f64>,
  #[serde(rename = "avgVelocityPerFTE")]
  pub avg_velocity_per_fte: Option<f64>,
  #[serde(default)]
  pub velocity_samples: Vec<f64>,
  #[serde(rename = "requiredFTEToHitTarget")]
  pub required_fte_to_hit_target: Option<f64>,
  #[serde(rename = "suggestedFTEMax")]
  pub suggested_fte_max: Option<f64>,
  pub projected_velocity: Option<f64>,
  pub projected_sprints: Option<f64>,
  pub projected_completion_ms: Option<i64>,
  pub projected_completion_early_ms: Option<i64>,
  pub projected_completion_late_ms: Option<i64>,
}

/// Aggregate root handed to rendering layers. Treated as an immutable value:
/// every transformation returns a new model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnupModel {
  pub sprint_length_days: u32,
  pub sprint_length_ms: i64,
  pub fte: f64,
  pub origin_ms: i64,
  pub origin_date: String,
  pub target_date_ms: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub target_date: Option<String>,
  pub target_scope: u32,
  pub latest_scope: u32,
  pub today_ms: i64,
  pub today_date: String,
  pub current_sprint: Option<SprintWindow>,
  pub story_count: u32,
  pub cancelled_count: u32,
  pub has_any_done: bool,
  pub sprints: Vec<SprintSummary>,
  pub projection: Projection,
  pub is_on_track: Option<bool>,
  pub projected_days_vs_target: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub scope_override: Option<u32>,
}

/// Projected completion for one hypothetical FTE value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FteScenario {
  pub fte: f64,
  pub projected_velocity: Option<f64>,
  pub projected_completion_ms: Option<i64>,
  pub projected_completion_early_ms: Option<i64>,
  pub projected_completion_late_ms: Option<i64>,
  pub is_on_track: Option<bool>,
}

impl FteScenario {
  pub fn from_model(model: &BurnupModel) -> Self {
    Self {
      fte: model.fte,
      projected_velocity: model.projection.projected_velocity,
      projected_completion_ms: model.projection.projected_completion_ms,
      projected_completion_early_ms: model.projection.projected_completion_early_ms,
      projected_completion_late_ms: model.projection.projected_completion_late_ms,
      is_on_track: model.is_on_track,
    }
  }
}
