// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Epoch-day date helpers, working-day arithmetic, "now" resolution, path and man page helpers
// role: utilities/helpers
// inputs: Date strings (strict and loose ISO-8601); epoch milliseconds; clap CommandFactory
// outputs: Epoch-day aligned millisecond timestamps, YYYY-MM-DD strings, man page text
// side_effects: effective_now reads the wall clock only when no override is supplied
// invariants:
// - parse_date_ms never panics; malformed input yields None
// - every timestamp returned by parse_date_ms is floored to midnight UTC
// - subtract_working_days always moves back at least one working day
// errors: None surfaced; helpers are total
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::CommandFactory;

pub const DAY_MS: i64 = 86_400_000;

pub fn canonicalize_lossy<P: AsRef<Path>>(p: P) -> String {
  let p = p.as_ref();
  let pb: PathBuf = match std::fs::canonicalize(p) {
    Ok(x) => x,
    Err(_) => match std::env::current_dir() {
      Ok(cwd) => cwd.join(p),
      Err(_) => PathBuf::from(p),
    },
  };
  pb.to_string_lossy().to_string()
}

/// Truncate a millisecond timestamp to midnight UTC of its calendar day.
pub fn floor_to_epoch_day(ms: i64) -> i64 {
  ms.div_euclid(DAY_MS) * DAY_MS
}

/// Parse a tracker date string into an epoch-day aligned millisecond timestamp.
///
/// Accepts `YYYY-MM-DD`, RFC3339 (`2025-01-20T10:00:00Z`), offsets without a
/// colon as emitted by issue trackers (`2025-01-20T10:15:30.000+0000`) and naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` timestamps, which are read as UTC.
/// Returns `None` for anything else so callers can filter instead of failing.
pub fn parse_date_ms(raw: &str) -> Option<i64> {
  let s = raw.trim();

  if s.is_empty() {
    return None;
  }

  let ms = if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
    d.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis()
  } else if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    dt.timestamp_millis()
  } else if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
    dt.timestamp_millis()
  } else if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
    ndt.and_utc().timestamp_millis()
  } else {
    return None;
  };

  Some(floor_to_epoch_day(ms))
}

/// Parse an optional date string; `None` in, `None` out.
pub fn parse_opt_date_ms(raw: Option<&str>) -> Option<i64> {
  raw.and_then(parse_date_ms)
}

/// Day of week for an epoch millisecond timestamp, Monday = 0 .. Sunday = 6.
fn weekday_from_monday(ms: i64) -> i64 {
  // 1970-01-01 was a Thursday
  (ms.div_euclid(DAY_MS) + 3).rem_euclid(7)
}

pub fn is_working_day(ms: i64) -> bool {
  weekday_from_monday(ms) < 5
}

/// Step back from `ms` until `working_days` Monday–Friday days have been passed.
///
/// The starting day itself is not counted. At least one working day is always
/// subtracted, even when `working_days` is zero.
pub fn subtract_working_days(ms: i64, working_days: u32) -> i64 {
  let target = working_days.max(1);
  let mut cursor = floor_to_epoch_day(ms);
  let mut counted = 0u32;

  while counted < target {
    cursor -= DAY_MS;
    if is_working_day(cursor) {
      counted += 1;
    }
  }

  cursor
}

/// Render an epoch millisecond timestamp as a UTC `YYYY-MM-DD` string.
pub fn iso_date(ms: i64) -> String {
  match Utc.timestamp_millis_opt(ms).single() {
    Some(dt) => dt.format("%Y-%m-%d").to_string(),
    None => String::new(),
  }
}

/// Returns the effective "now" given an optional override.
///
/// When `override_now` is `Some`, that instant is returned; otherwise the
/// current UTC time is used. This is the only place the wall clock is read.
pub fn effective_now(override_now: Option<DateTime<Utc>>) -> DateTime<Utc> {
  override_now.unwrap_or_else(Utc::now)
}

/// Parse a `--now-override` string into a UTC DateTime.
/// Accepts RFC3339 (e.g. 2025-08-15T12:00:00Z), a naive `%Y-%m-%dT%H:%M:%S`
/// timestamp read as UTC, or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_now_override(s: Option<&str>) -> Option<DateTime<Utc>> {
  s.and_then(|raw| {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
      .ok()
      .map(|dt| dt.with_timezone(&Utc))
      .or_else(|| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
          .ok()
          .map(|ndt| ndt.and_utc())
      })
      .or_else(|| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
          .ok()
          .and_then(|d| d.and_hms_opt(0, 0, 0))
          .map(|ndt| ndt.and_utc())
      })
  })
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
