use serde_json::Value;
use test_support::{fixture_path, forecast_cmd};

fn run(extra: &[&str]) -> Value {
  let issues = fixture_path("steady_team.json");
  let mut args = vec!["--issues", issues.as_str(), "--target", "2025-06-01"];
  args.extend_from_slice(extra);
  let out = forecast_cmd().args(&args).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn scenarios_are_reported_per_fte() {
  let v = run(&["--scenario-fte", "1", "--scenario-fte", "2", "--scenario-fte", "0.5"]);
  let s = v["scenarios"].as_array().unwrap();
  assert_eq!(s.len(), 3);

  assert_eq!(s[0]["projectedCompletionMs"], v["model"]["projection"]["projectedCompletionMs"]);
  assert_eq!(s[1]["fte"], 2.0);
  assert_eq!(s[1]["projectedVelocity"], 6.0);
  assert_eq!(s[1]["isOnTrack"], true);
  // half capacity: 12 remaining at 1.5/sprint is 8 sprints past 2025-03-03, after the target
  assert_eq!(s[2]["projectedVelocity"], 1.5);
  assert_eq!(s[2]["isOnTrack"], false);
}

#[test]
fn scenarios_leave_base_model_untouched() {
  let base = run(&[]);
  let with = run(&["--scenario-fte", "3"]);
  assert_eq!(base["model"], with["model"]);
  assert_eq!(base["scenarios"], serde_json::json!([]));
}

#[test]
fn scope_override_replans_open_sprints() {
  let v = run(&["--scope-override", "26", "--scenario-fte", "1"]);
  let m = &v["model"];
  assert_eq!(m["scopeOverride"], 26);
  assert_eq!(m["latestScope"], 26);
  assert_eq!(m["projection"]["remainingStoriesFromAnchor"], 18);

  for s in m["sprints"].as_array().unwrap() {
    if s["isClosed"] == false {
      assert_eq!(s["scopeAtEnd"], 26);
    }
  }
  assert_eq!(v["scenarios"][0]["projectedCompletionMs"], m["projection"]["projectedCompletionMs"]);
}
