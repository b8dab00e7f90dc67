use serde_json::{json, Value};
use test_support::{fixture_path, forecast_cmd, tempdir, write_issues};

fn run_json(args: &[&str]) -> Value {
  let out = forecast_cmd().args(args).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).unwrap()
}

fn closed_done(model: &Value) -> Vec<u64> {
  model["sprints"]
    .as_array()
    .unwrap()
    .iter()
    .filter(|s| s["isClosed"] == true)
    .map(|s| s["doneThisSprint"].as_u64().unwrap())
    .collect()
}

fn date_of(ms: &Value) -> String {
  let ms = ms.as_i64().expect("timestamp");
  chrono::DateTime::from_timestamp_millis(ms).unwrap().format("%Y-%m-%d").to_string()
}

#[test]
fn steady_team_forecast() {
  let v = run_json(&["--issues", &fixture_path("steady_team.json"), "--target", "2025-06-01"]);
  let m = &v["model"];

  assert_eq!(m["originDate"], "2025-01-06");
  assert_eq!(m["todayDate"], "2025-03-03");
  assert_eq!(m["latestScope"], 20);
  assert_eq!(m["storyCount"], 20);
  assert_eq!(m["cancelledCount"], 1);
  assert_eq!(closed_done(m), vec![0, 2, 3, 3]);

  let p = &m["projection"];
  assert_eq!(p["hasSignal"], true);
  assert_eq!(p["fromSprintIndex"], 3);
  assert_eq!(p["fromDone"], 8);
  assert_eq!(p["avgVelocityPerFTE"], 3.0);
  assert_eq!(p["velocitySamples"], json!([3.0, 3.0]));
  assert_eq!(date_of(&p["projectedCompletionMs"]), "2025-04-28");
  assert_eq!(date_of(&p["projectedCompletionEarlyMs"]), "2025-04-18");
  assert_eq!(date_of(&p["projectedCompletionLateMs"]), "2025-05-12");
  assert_eq!(m["isOnTrack"], true);
  assert_eq!(m["projectedDaysVsTarget"], -34);
}

#[test]
fn no_target_yields_empty_model() {
  let v = run_json(&["--issues", &fixture_path("steady_team.json")]);
  let m = &v["model"];
  assert!(m["targetDateMs"].is_null());
  assert!(m.get("targetDate").is_none());
  assert_eq!(m["sprints"], json!([]));
  assert_eq!(m["projection"]["hasSignal"], false);
  assert_eq!(m["originDate"], "2025-03-03");
}

#[test]
fn no_completions_keeps_anchor_without_signal() {
  let v = run_json(&[
    "--issues",
    &fixture_path("no_completions.json"),
    "--target",
    "2025-06-01",
    "--sprint-start",
    "2025-01-06",
  ]);
  let m = &v["model"];
  assert_eq!(m["originDate"], "2025-01-06");
  assert_eq!(m["hasAnyDone"], false);

  let p = &m["projection"];
  assert_eq!(p["hasSignal"], false);
  assert_eq!(p["fromSprintIndex"], 3);
  assert_eq!(p["fromDone"], 0);
  assert_eq!(p["remainingStoriesFromAnchor"], 2);
  assert!(p["projectedCompletionMs"].is_null());
  assert!(m["isOnTrack"].is_null());
}

#[test]
fn no_completions_without_fallback_starts_at_first_creation() {
  let v = run_json(&["--issues", &fixture_path("no_completions.json"), "--target", "2025-06-01"]);
  assert_eq!(v["model"]["originDate"], "2025-02-10");
}

#[test]
fn single_completion_sets_origin_two_weeks_of_working_days_earlier() {
  let td = tempdir();
  let issues = json!([
    { "key": "S-1", "created": "2025-01-01", "resolved": "2025-01-20", "status": "Done", "statusCategory": "Done" },
    { "key": "S-2", "created": "2025-01-01", "status": "To Do", "statusCategory": "To Do" },
    { "key": "S-3", "created": "2025-01-01", "status": "To Do", "statusCategory": "To Do" },
    { "key": "S-4", "created": "2025-01-01", "status": "To Do", "statusCategory": "To Do" }
  ]);
  let path = write_issues(td.path(), "single.json", &issues);
  let v = run_json(&["--issues", &path, "--target", "2025-06-01"]);
  let m = &v["model"];

  assert_eq!(m["originDate"], "2025-01-06");
  assert_eq!(closed_done(m), vec![0, 1, 0, 0]);
  assert_eq!(m["projection"]["velocitySamples"], json!([1.0]));
  assert_eq!(date_of(&m["projection"]["projectedCompletionMs"]), "2025-04-14");
}

#[test]
fn everything_done_completes_at_anchor() {
  let td = tempdir();
  let issues: Vec<Value> = ["2025-01-20", "2025-01-24", "2025-02-03", "2025-02-04"]
    .iter()
    .enumerate()
    .map(|(i, r)| json!({ "key": format!("F-{}", i), "created": "2025-01-02", "resolved": r, "status": "Done", "statusCategory": "Done" }))
    .collect();
  let issues = Value::Array(issues);
  let path = write_issues(td.path(), "finished.json", &issues);
  let v = run_json(&["--issues", &path, "--target", "2025-06-01"]);
  let p = &v["model"]["projection"];

  assert_eq!(p["remainingStoriesFromAnchor"], 0);
  assert_eq!(p["requiredFTEToHitTarget"], 0.0);
  assert_eq!(p["suggestedFTEMax"], 2.0);
  assert_eq!(p["projectedCompletionMs"], p["fromTimeMs"]);
  assert_eq!(p["projectedCompletionEarlyMs"], p["fromTimeMs"]);
  assert_eq!(p["projectedCompletionLateMs"], p["fromTimeMs"]);
  assert_eq!(v["model"]["projectedDaysVsTarget"], -90);
}

#[test]
fn withdrawn_story_counts_toward_nothing() {
  let td = tempdir();
  let mut issues: Vec<Value> = serde_json::from_str(&test_support::read_fixture_text("steady_team.json")).unwrap();
  let baseline = write_issues(td.path(), "baseline.json", &Value::Array(issues.clone()));
  issues.push(json!({ "key": "X-1", "created": "2025-01-02", "resolved": "2025-01-10", "status": "Won't Do", "statusCategory": "Done" }));
  let with_wont_do = write_issues(td.path(), "wont_do.json", &Value::Array(issues));

  let a = run_json(&["--issues", &baseline, "--target", "2025-06-01"]);
  let b = run_json(&["--issues", &with_wont_do, "--target", "2025-06-01"]);

  assert_eq!(a["model"]["sprints"], b["model"]["sprints"]);
  assert_eq!(a["model"]["originDate"], b["model"]["originDate"]);
  assert_eq!(b["model"]["cancelledCount"], 2);
}

#[test]
fn reads_issues_from_stdin() {
  let body = test_support::read_fixture_text("steady_team.json");
  let out = forecast_cmd()
    .args(["--issues", "-", "--target", "2025-06-01"])
    .write_stdin(body)
    .output()
    .unwrap();
  assert!(out.status.success());
  let v: Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["config"]["issues"], "-");
  assert_eq!(v["model"]["latestScope"], 20);
}
