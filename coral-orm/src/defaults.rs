//! Default producers for `Field::default_with` and `#[orm(default = "...")]`.

use chrono::Utc;
use uuid::Uuid;

use crate::Value;

/// A 50 character, time ordered text id.
///
/// Zero-padded milliseconds since the epoch, a random uuid in hex and a
/// `000` suffix.
pub fn next_id() -> Value {
    Value::Text(format!("{:015}{}000", Utc::now().timestamp_millis(), Uuid::new_v4().simple()))
}

/// The current Unix time in seconds.
pub fn now() -> Value {
    Value::Float(Utc::now().timestamp_micros() as f64 / 1_000_000.0)
}
