//! `google.protobuf.Timestamp` ↔ `DateTime<Utc>` conversions
//!
//! Protobuf timestamps are only meaningful between `0001-01-01T00:00:00Z`
//! and `9999-12-31T23:59:59.999999999Z` with `nanos` in `[0, 1e9)`. Both
//! directions reject anything outside that window instead of clamping, so
//! callers can classify the failure themselves.
//!
//! ```ignore
//! use grpc_client::conversions::*;
//!
//! let ts = datetime_to_timestamp(Utc::now())?;
//! let back = timestamp_to_datetime(&ts)?;
//! ```

use chrono::{DateTime, Utc};
use prost_types::Timestamp;

/// Seconds of `0001-01-01T00:00:00Z`
pub const MIN_TIMESTAMP_SECONDS: i64 = -62_135_596_800;

/// Seconds of `9999-12-31T23:59:59Z`
pub const MAX_TIMESTAMP_SECONDS: i64 = 253_402_300_799;

const NANOS_PER_SECOND: i32 = 1_000_000_000;

/// Check that a timestamp lies inside the protobuf-representable range
pub fn validate_timestamp(ts: &Timestamp) -> Result<(), String> {
  if ts.seconds < MIN_TIMESTAMP_SECONDS || ts.seconds > MAX_TIMESTAMP_SECONDS {
    return Err(format!(
      "timestamp seconds {} outside range [{}, {}]",
      ts.seconds, MIN_TIMESTAMP_SECONDS, MAX_TIMESTAMP_SECONDS
    ));
  }
  if ts.nanos < 0 || ts.nanos >= NANOS_PER_SECOND {
    return Err(format!("timestamp nanos {} outside range [0, 1e9)", ts.nanos));
  }
  Ok(())
}

/// Convert a protobuf timestamp to `DateTime<Utc>` without losing precision
pub fn timestamp_to_datetime(ts: &Timestamp) -> Result<DateTime<Utc>, String> {
  validate_timestamp(ts)?;
  // nanos is non-negative after validation
  DateTime::from_timestamp(ts.seconds, ts.nanos as u32)
    .ok_or_else(|| format!("timestamp {}.{:09}s is not representable", ts.seconds, ts.nanos))
}

/// Convert an optional protobuf timestamp, treating `None` as an error
pub fn required_timestamp_to_datetime(
  ts: Option<&Timestamp>,
  field: &str,
) -> Result<DateTime<Utc>, String> {
  match ts {
    Some(ts) => timestamp_to_datetime(ts),
    None => Err(format!("{field} is required")),
  }
}

/// Convert `DateTime<Utc>` to a protobuf timestamp
///
/// Fails for dates outside the protobuf range and for chrono's leap-second
/// representation (sub-second nanos ≥ 1e9).
pub fn datetime_to_timestamp(dt: DateTime<Utc>) -> Result<Timestamp, String> {
  let nanos = i32::try_from(dt.timestamp_subsec_nanos())
    .map_err(|_| format!("sub-second nanos of {dt} do not fit a timestamp"))?;
  let ts = Timestamp {
    seconds: dt.timestamp(),
    nanos,
  };
  validate_timestamp(&ts)?;
  Ok(ts)
}
