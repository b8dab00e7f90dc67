use serde_json::Value;
use test_support::{cmd_bin, fixture_path, BIN};

fn model_for(fixture: &str) -> Value {
  let out = cmd_bin(BIN)
    .args([
      "--issues",
      &fixture_path(fixture),
      "--target",
      "2025-02-28",
      "--sprint-length-days",
      "7",
      "--now-override",
      "2025-01-27T09:00:00Z",
    ])
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let v: Value = serde_json::from_slice(&out.stdout).unwrap();
  v["model"].clone()
}

#[test]
fn search_page_export_is_read_from_nested_fields() {
  let m = model_for("small_search_page.json");
  assert_eq!(m["sprintLengthDays"], 7);
  assert_eq!(m["originDate"], "2025-01-01");
  assert_eq!(m["latestScope"], 4);
  assert_eq!(m["projection"]["fromSprintIndex"], 2);
  assert_eq!(m["projection"]["fromDone"], 2);
}

#[test]
fn paged_export_matches_single_page() {
  assert_eq!(model_for("small_paged.json"), model_for("small_search_page.json"));
}
