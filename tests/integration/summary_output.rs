use predicates::prelude::*;
use test_support::{fixture_path, forecast_cmd, tempdir};

#[test]
fn summary_format_prints_forecast_table() {
  forecast_cmd()
    .args([
      "--issues",
      &fixture_path("steady_team.json"),
      "--target",
      "2025-06-01",
      "--format",
      "summary",
      "--scenario-fte",
      "2",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Burn-up forecast"))
    .stdout(predicate::str::contains("2025-04-28"))
    .stdout(predicate::str::contains("Scenarios"))
    .stdout(predicate::str::contains("2025-03-31 (on track)"));
}

#[test]
fn out_path_writes_file_and_keeps_stdout_empty() {
  let td = tempdir();
  let out = td.path().join("reports/q1/forecast.json");
  let out_s = out.to_string_lossy().to_string();

  forecast_cmd()
    .args(["--issues", &fixture_path("steady_team.json"), "--target", "2025-06-01", "--out", &out_s])
    .assert()
    .success()
    .stdout(predicate::str::is_empty());

  let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
  assert_eq!(v["model"]["latestScope"], 20);
  assert_eq!(v["config"]["out"], out_s);
}
