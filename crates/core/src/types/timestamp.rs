//! Lenient timestamp (de)serialization.
//!
//! Timestamps are written the way a browser's `toISOString()` writes them
//! (`2024-03-01T10:15:00.000Z`). On read, the data file may also hold bare
//! dates typed into the admin order form (`2024-03-01`), naive date-times,
//! or epoch milliseconds.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

/// Parse a timestamp string in any of the accepted shapes.
#[must_use]
pub fn parse_loose(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Render a timestamp in the stored format.
#[must_use]
pub fn format(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

struct LooseVisitor;

impl Visitor<'_> for LooseVisitor {
    type Value = DateTime<Utc>;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("an RFC 3339 timestamp, a YYYY-MM-DD date or epoch milliseconds")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        parse_loose(v).ok_or_else(|| E::custom(format!("invalid timestamp: {v:?}")))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        DateTime::from_timestamp_millis(v)
            .ok_or_else(|| E::custom(format!("timestamp {v} out of range")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let millis = i64::try_from(v).map_err(|_| E::custom("timestamp out of range"))?;
        self.visit_i64(millis)
    }
}

/// `#[serde(with = "loose")]` for required timestamps.
pub mod loose {
    use super::{DateTime, Deserializer, LooseVisitor, Serializer, Utc};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        deserializer.deserialize_any(LooseVisitor)
    }
}

/// `#[serde(default, with = "loose_option")]` for optional timestamps.
pub mod loose_option {
    use serde::Deserialize;

    use super::{DateTime, Deserializer, Serializer, Utc};

    #[derive(Deserialize)]
    struct Wrapper(#[serde(with = "super::loose")] DateTime<Utc>);

    #[allow(clippy::ref_option)] // serde's `with` passes `&Option<T>`
    pub fn serialize<S: Serializer>(
        dt: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => serializer.serialize_some(&super::format(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<Wrapper>::deserialize(deserializer).map(|w| w.map(|Wrapper(dt)| dt))
    }
}
