//! Parsing and formatting of departure/arrival timestamps.
//!
//! Timestamps are naive local date-times: the yard works in a single
//! timezone and the web page sends `datetime-local` values such as
//! `2025-02-18T06:00`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

/// Wire format for serialized timestamps.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Human format used in CSV exports (`DD/MM/YYYY HH:MM`).
pub const EXPORT_FORMAT: &str = "%d/%m/%Y %H:%M";

const ACCEPTED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 local date-time, with or without seconds.
///
/// # Examples
///
/// ```
/// use railplan_common::datetime::parse_local;
///
/// let dt = parse_local("2025-02-18T06:00").unwrap();
/// assert_eq!(dt.format("%H:%M").to_string(), "06:00");
/// assert!(parse_local("18/02/2025").is_err());
/// ```
pub fn parse_local(input: &str) -> Result<NaiveDateTime, String> {
    let trimmed = input.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| format!("invalid date-time '{input}', expected YYYY-MM-DDTHH:MM[:SS]"))
}

pub fn format_iso(dt: &NaiveDateTime) -> String {
    dt.format(ISO_FORMAT).to_string()
}

pub fn format_export(dt: &NaiveDateTime) -> String {
    dt.format(EXPORT_FORMAT).to_string()
}

pub fn serialize<S>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_iso(dt))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_local(&raw).map_err(serde::de::Error::custom)
}

/// Serde helpers for `Option<NaiveDateTime>` fields of partial updates.
pub mod option {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => super::serialize(dt, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| super::parse_local(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}
