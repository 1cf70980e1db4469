//! Timestamp parsing and serde helpers.
//!
//! Timestamps are written as RFC 3339. Reading also accepts a bare calendar
//! date (`YYYY-MM-DD`), which maps to midnight UTC of that day.

use serde::{Deserialize, Deserializer, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date.
///
/// # Errors
/// Returns the RFC 3339 parse error when neither form matches.
pub fn parse_timestamp(input: &str) -> Result<OffsetDateTime, time::error::Parse> {
    let trimmed = input.trim();
    match OffsetDateTime::parse(trimmed, &Rfc3339) {
        Ok(parsed) => Ok(parsed.to_offset(UtcOffset::UTC)),
        Err(err) => Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
            .map(|date| date.midnight().assume_utc())
            .map_err(|_| err),
    }
}

/// Format a timestamp as RFC 3339, falling back to the debug form for
/// values outside the representable range.
#[must_use]
pub fn format_timestamp(value: OffsetDateTime) -> String {
    value.format(&Rfc3339).unwrap_or_else(|_| value.to_string())
}

/// Serialize a required timestamp.
///
/// # Errors
/// Propagates serializer errors and out-of-range timestamps.
pub fn serialize<S>(value: &OffsetDateTime, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let text = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
    s.serialize_str(&text)
}

/// Deserialize a required timestamp.
///
/// # Errors
/// Fails when the value is not a string in either accepted form.
pub fn deserialize<'de, D>(d: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(d)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Serde helpers for `Option<OffsetDateTime>`; `null` and `""` both read as `None`.
pub mod option {
    use super::{Deserialize, Deserializer, OffsetDateTime, Serializer, parse_timestamp};

    /// Serialize an optional timestamp.
    ///
    /// # Errors
    /// Propagates serializer errors and out-of-range timestamps.
    pub fn serialize<S>(value: &Option<OffsetDateTime>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => super::serialize(ts, s),
            None => s.serialize_none(),
        }
    }

    /// Deserialize an optional timestamp.
    ///
    /// # Errors
    /// Fails when a non-empty string is in neither accepted form.
    pub fn deserialize<'de, D>(d: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse_timestamp(text).map(Some).map_err(serde::de::Error::custom),
        }
    }
}
