// ABOUTME: Custom serde helpers for config durations.
// ABOUTME: Accepts plain seconds (the JSON form) or humantime strings like "5s".

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

#[derive(Deserialize)]
#[serde(untagged)]
enum DurationRepr {
    Seconds(f64),
    Human(humantime_serde::Serde<Duration>),
}

pub fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    match DurationRepr::deserialize(deserializer)? {
        DurationRepr::Seconds(secs) if secs.is_finite() && secs >= 0.0 => {
            Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
        }
        DurationRepr::Seconds(secs) => Err(serde::de::Error::custom(format!(
            "duration must be a non-negative number of seconds, got {secs}"
        ))),
        DurationRepr::Human(duration) => Ok(duration.into_inner()),
    }
}

/// Writes whole seconds as an integer so generated JSON matches hand-written files.
pub fn serialize_seconds<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if duration.subsec_nanos() == 0 {
        serializer.serialize_u64(duration.as_secs())
    } else {
        serializer.serialize_f64(duration.as_secs_f64())
    }
}
