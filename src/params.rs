use crate::burnup::BuildBurnupInput;
use crate::cli::EffectiveConfig;
use crate::model::RawIssue;

/// Map a frozen CLI configuration plus loaded issues onto the builder input.
/// "Today" is left unset so the builder derives it from the resolved now.
pub fn build_burnup_input(cfg: &EffectiveConfig, stories: Vec<RawIssue>) -> BuildBurnupInput {
  BuildBurnupInput {
    stories,
    sprint_start_iso: cfg.sprint_start.clone(),
    dev_completion_iso: cfg.target.clone(),
    sprint_fte: cfg.fte,
    today_iso: None,
    sprint_length_days: Some(cfg.sprint_length_days),
  }
}
