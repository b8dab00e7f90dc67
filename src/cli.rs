use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::burnup::DEFAULT_SPRINT_LENGTH_DAYS;
use crate::util;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  Json,
  Summary,
}

#[derive(Parser, Debug)]
#[command(
    name = "burnup-forecast",
    version,
    about = "Sprint burn-up history and velocity-based completion forecasts from tracker exports",
    long_about = None
)]
pub struct Cli {
  /// Issue export (JSON array of issues, a search page, or an array of pages); "-" reads stdin
  #[arg(long, required_unless_present = "gen_man")]
  pub issues: Option<String>,

  /// Target completion date, e.g. 2025-06-01
  #[arg(long)]
  pub target: Option<String>,

  /// Fallback sprint cadence start, used only when nothing has been completed yet
  #[arg(long)]
  pub sprint_start: Option<String>,

  /// Team capacity in full-time equivalents
  #[arg(long, default_value_t = 1.0)]
  pub fte: f64,

  /// Calendar days per sprint
  #[arg(long, default_value_t = DEFAULT_SPRINT_LENGTH_DAYS)]
  pub sprint_length_days: u32,

  /// Extra FTE values to forecast side by side (repeatable)
  #[arg(long = "scenario-fte")]
  pub scenario_fte: Vec<f64>,

  /// Replace the scope of open sprints with this total before projecting
  #[arg(long)]
  pub scope_override: Option<u32>,

  /// Output format
  #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
  pub format: OutputFormat,

  /// Output file path (default stdout "-")
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant used as today (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
  pub issues: String, // absolute path unless stdin
  pub target: Option<String>,
  pub sprint_start: Option<String>,
  pub fte: f64,
  pub sprint_length_days: u32,
  pub scenario_ftes: Vec<f64>,
  pub scope_override: Option<u32>,
  pub format: OutputFormat,
  pub out: String,
  pub now_override: Option<String>,
}

fn check_fte(flag: &str, fte: f64) -> Result<()> {
  if !fte.is_finite() || fte < 0.0 {
    bail!("{} must be a finite, non-negative number (got {})", flag, fte);
  }
  Ok(())
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let Some(issues) = cli.issues else {
    bail!("Provide --issues <PATH> (or - for stdin)");
  };

  check_fte("--fte", cli.fte)?;
  for fte in &cli.scenario_fte {
    check_fte("--scenario-fte", *fte)?;
  }

  if cli.sprint_length_days == 0 {
    bail!("--sprint-length-days must be at least 1");
  }

  if cli.now_override.is_some() && util::parse_now_override(cli.now_override.as_deref()).is_none() {
    bail!(
      "Unparseable --now-override {:?}: expected RFC3339 or YYYY-MM-DD",
      cli.now_override.as_deref().unwrap_or_default()
    );
  }

  let issues = if issues == "-" { issues } else { util::canonicalize_lossy(&issues) };

  Ok(EffectiveConfig {
    issues,
    target: cli.target,
    sprint_start: cli.sprint_start,
    fte: cli.fte,
    sprint_length_days: cli.sprint_length_days,
    scenario_ftes: cli.scenario_fte,
    scope_override: cli.scope_override,
    format: cli.format,
    out: cli.out,
    now_override: cli.now_override,
  })
}
