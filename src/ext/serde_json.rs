// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Dotted-path lookups over serde_json::Value for tracker payloads whose field layout varies by export
// role: extension/serde_json
// outputs: JsonFetch trait (fetch, fetch_first) and JsonFetched wrapper for typed extraction
// invariants: No panics; missing paths and JSON null yield None; numeric segments index into arrays
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Wrapper around a JSON location to allow typed extraction via a clear second step.
pub struct JsonFetched<'a> {
  inner: Option<&'a Value>,
}

impl<'a> JsonFetched<'a> {
  /// Attempt to deserialize the fetched value as `T`.
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self.inner.and_then(|v| T::deserialize(v).ok())
  }

  /// Borrow the fetched value as a string slice, if it is one.
  pub fn as_str(&self) -> Option<&'a str> {
    self.inner.and_then(Value::as_str)
  }

  pub fn is_some(&self) -> bool {
    self.inner.is_some()
  }
}

/// Fetch nested values via dotted paths like "fields.status.name" or "issues.0.key".
pub trait JsonFetch {
  fn fetch(&self, path: &str) -> JsonFetched<'_>;

  /// First of several candidate paths that resolves to a non-null value.
  fn fetch_first(&self, paths: &[&str]) -> JsonFetched<'_>;
}

fn step<'a>(cur: &'a Value, key: &str) -> Option<&'a Value> {
  match cur {
    Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
    _ => cur.get(key),
  }
}

impl JsonFetch for Value {
  fn fetch(&self, path: &str) -> JsonFetched<'_> {
    if path.is_empty() {
      return JsonFetched { inner: Some(self) };
    }

    let mut cur = self;

    for key in path.split('.') {
      match step(cur, key) {
        Some(next) => cur = next,
        None => return JsonFetched { inner: None },
      }
    }

    let inner = if cur.is_null() { None } else { Some(cur) };
    JsonFetched { inner }
  }

  fn fetch_first(&self, paths: &[&str]) -> JsonFetched<'_> {
    paths
      .iter()
      .map(|p| self.fetch(p))
      .find(|f| f.is_some())
      .unwrap_or(JsonFetched { inner: None })
  }
}
