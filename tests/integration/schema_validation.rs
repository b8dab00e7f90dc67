use jsonschema::validator_for;
use test_support::{fixture_path, forecast_cmd};

fn read_schema(name: &str) -> serde_json::Value {
  let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
  let path = manifest_dir.join("tests").join("schemas").join(name);
  let data = std::fs::read(&path).expect("schema file");
  serde_json::from_slice(&data).expect("valid schema JSON")
}

fn compile_schema(name: &str) -> jsonschema::Validator {
  let schema = read_schema(name);
  validator_for(&schema).expect("compile schema")
}

fn report(args: &[&str]) -> serde_json::Value {
  let out = forecast_cmd().args(args).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn forecast_json_conforms_to_schema() {
  let compiled = compile_schema("burnup-model.schema.json");
  let v = report(&[
    "--issues",
    &fixture_path("steady_team.json"),
    "--target",
    "2025-06-01",
    "--scenario-fte",
    "2",
    "--scope-override",
    "24",
  ]);
  compiled.validate(&v).expect("schema validation failed for forecast JSON");
}

#[test]
fn empty_and_signal_less_models_conform_to_schema() {
  let compiled = compile_schema("burnup-model.schema.json");

  let empty = report(&["--issues", &fixture_path("steady_team.json")]);
  compiled.validate(&empty).expect("schema validation failed for empty model");

  let no_signal = report(&["--issues", &fixture_path("no_completions.json"), "--target", "2025-06-01"]);
  compiled.validate(&no_signal).expect("schema validation failed for no-signal model");
}
