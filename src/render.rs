// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate load -> build -> override -> scenarios and write the report as JSON or a text summary
// role: rendering/orchestration
// inputs: EffectiveConfig, resolved "now"
// outputs: ForecastReport { config, model, scenarios } written to --out or stdout
// side_effects: Reads the issue export; creates parent directories and writes the output file when --out is a path
// invariants:
// - Scope override is applied before scenarios so scenarios forecast against the overridden scope
// - stdout carries only the report; diagnostics go through tracing
// errors: Propagates load and write errors with path context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::burnup::{build_burnup_model, fte_scenarios, with_scope_override};
use crate::cli::{EffectiveConfig, OutputFormat};
use crate::model::{BurnupModel, FteScenario};
use crate::params::build_burnup_input;
use crate::source::load_issues;
use crate::util::iso_date;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReport {
  pub config: EffectiveConfig,
  pub model: BurnupModel,
  pub scenarios: Vec<FteScenario>,
}

pub fn build_report(cfg: &EffectiveConfig, now: DateTime<Utc>) -> Result<ForecastReport> {
  let stories = load_issues(&cfg.issues)?;
  info!(issues = stories.len(), source = %cfg.issues, "loaded issue export");

  let input = build_burnup_input(cfg, stories);
  let mut model = build_burnup_model(&input, now);
  if let Some(total) = cfg.scope_override {
    model = with_scope_override(&model, total);
  }
  let scenarios = fte_scenarios(&model, &cfg.scenario_ftes);

  Ok(ForecastReport { config: cfg.clone(), model, scenarios })
}

fn opt_date(ms: Option<i64>) -> String {
  ms.map(iso_date).unwrap_or_else(|| "-".to_string())
}

fn on_track_label(is_on_track: Option<bool>) -> &'static str {
  match is_on_track {
    Some(true) => "on track",
    Some(false) => "late",
    None => "unknown",
  }
}

/// Plain-text rendering of a report for terminals.
pub fn render_summary(report: &ForecastReport) -> String {
  let m = &report.model;
  let p = &m.projection;
  let mut s = String::new();

  let _ = writeln!(s, "Burn-up forecast");
  let _ = writeln!(s, "  today:         {}", m.today_date);
  let _ = writeln!(s, "  origin:        {} ({}-day sprints)", m.origin_date, m.sprint_length_days);
  let _ = writeln!(s, "  target:        {}", m.target_date.as_deref().unwrap_or("-"));
  let _ = writeln!(s, "  scope:         {} latest, {} at target", m.latest_scope, m.target_scope);
  if let Some(total) = m.scope_override {
    let _ = writeln!(s, "  scope override: {}", total);
  }
  let _ = writeln!(s, "  stories:       {} ({} cancelled)", m.story_count, m.cancelled_count);
  let _ = writeln!(s, "  fte:           {}", m.fte);

  if !m.sprints.is_empty() {
    let _ = writeln!(s);
    let _ = writeln!(s, "Sprints");
    let _ = writeln!(s, "  {:>3}  {:<10}  {:<10}  {:>5}  {:>4}  {:>5}  closed", "#", "start", "end", "scope", "done", "total");
    for sp in &m.sprints {
      let _ = writeln!(
        s,
        "  {:>3}  {:<10}  {:<10}  {:>5}  {:>4}  {:>5}  {}",
        sp.index,
        iso_date(sp.start_at),
        iso_date(sp.end_at),
        sp.scope_at_end,
        sp.done_this_sprint,
        sp.cumulative_done_at_end,
        if sp.is_closed { "yes" } else { "no" }
      );
    }
  }

  let _ = writeln!(s);
  let _ = writeln!(s, "Projection");
  if let (Some(idx), Some(done)) = (p.from_sprint_index, p.from_done) {
    let _ = writeln!(s, "  anchor:        sprint {} ending {} with {} done", idx, opt_date(p.from_time_ms), done);
  }
  if !p.has_signal {
    let _ = writeln!(s, "  no velocity signal yet");
  } else {
    let _ = writeln!(
      s,
      "  velocity:      {:.2} per FTE per sprint, {:.2} projected",
      p.avg_velocity_per_fte.unwrap_or_default(),
      p.projected_velocity.unwrap_or_default()
    );
    let _ = writeln!(
      s,
      "  completion:    {} (early {}, late {})",
      opt_date(p.projected_completion_ms),
      opt_date(p.projected_completion_early_ms),
      opt_date(p.projected_completion_late_ms)
    );
    if let Some(days) = m.projected_days_vs_target {
      let _ = writeln!(s, "  vs target:     {:+} days ({})", days, on_track_label(m.is_on_track));
    }
    if let Some(req) = p.required_fte_to_hit_target {
      let _ = writeln!(s, "  required fte:  {:.2}", req);
    }
  }

  if !report.scenarios.is_empty() {
    let _ = writeln!(s);
    let _ = writeln!(s, "Scenarios");
    for sc in &report.scenarios {
      let _ = writeln!(
        s,
        "  fte {:<6} {} ({})",
        sc.fte,
        opt_date(sc.projected_completion_ms),
        on_track_label(sc.is_on_track)
      );
    }
  }
  s
}

pub fn render(report: &ForecastReport, format: OutputFormat) -> Result<String> {
  match format {
    OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    OutputFormat::Summary => Ok(render_summary(report)),
  }
}

pub fn write_output(out: &str, body: &str) -> Result<()> {
  if out == "-" {
    println!("{}", body);
    return Ok(());
  }
  let path = Path::new(out);
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("creating output directory {}", parent.display()))?;
  }
  std::fs::write(path, body).with_context(|| format!("writing report to {}", out))?;
  info!(path = %out, "wrote report");
  Ok(())
}

pub fn run_report(cfg: &EffectiveConfig, now: DateTime<Utc>) -> Result<ForecastReport> {
  let report = build_report(cfg, now)?;
  let body = render(&report, cfg.format)?;
  write_output(&cfg.out, &body)?;
  Ok(report)
}
