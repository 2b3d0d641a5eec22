//! TargetFormat - the outbound encoding and its encoders.
//!
//! | Format | Output | Content type |
//! |--------|--------|--------------|
//! | `json` | inbound bytes, untouched | `application/json` |
//! | `xml`  | `<SourceEvent>` element with one child per field | `application/xml` |
//! | `csv`  | one line: `"id",temperature,humidity,"rfc3339 time"` | `text/csv` |
//!
//! CSV fields are not escaped beyond the literal quotes around `id` and the
//! timestamp, so an `id` containing `"` or `,` yields a malformed line.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, SecondsFormat, TimeZone};
use serde::Serialize;

use super::errors::ConversionError;
use super::event::SourceEvent;

/// Outbound encoding, resolved once from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetFormat {
    /// Passthrough: inbound and outbound share the JSON encoding.
    #[default]
    Json,
    Xml,
    Csv,
}

impl TargetFormat {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetFormat::Json => "json",
            TargetFormat::Xml => "xml",
            TargetFormat::Csv => "csv",
        }
    }

    /// MIME type of the encoded payload.
    pub fn content_type(&self) -> &'static str {
        match self {
            TargetFormat::Json => "application/json",
            TargetFormat::Xml => "application/xml",
            TargetFormat::Csv => "text/csv",
        }
    }

    /// Encodes `event` in this format.
    ///
    /// `original` is the raw inbound payload `event` was decoded from; only
    /// the JSON passthrough reads it. CSV timestamps are rendered in the
    /// system's local timezone.
    pub fn encode(&self, original: &[u8], event: &SourceEvent) -> Result<Vec<u8>, ConversionError> {
        let encoded = match self {
            TargetFormat::Json => original.to_vec(),
            TargetFormat::Xml => to_xml(event)?.into_bytes(),
            TargetFormat::Csv => to_csv(event, &Local)?.into_bytes(),
        };

        tracing::info!("Target: {}", String::from_utf8_lossy(&encoded));

        Ok(encoded)
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TargetFormat {
    type Err = ConversionError;

    /// Exact, case-insensitive match on `json`, `xml` or `csv`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(TargetFormat::Json),
            "xml" => Ok(TargetFormat::Xml),
            "csv" => Ok(TargetFormat::Csv),
            _ => Err(ConversionError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Resolves `format` by name and encodes `event` with it.
///
/// # Errors
///
/// - `UnsupportedFormat` if `format` is not `json`, `xml` or `csv`
/// - `Encode` if the selected encoder fails
pub fn encode(format: &str, original: &[u8], event: &SourceEvent) -> Result<Vec<u8>, ConversionError> {
    format.parse::<TargetFormat>()?.encode(original, event)
}

/// XML view of a `SourceEvent`; element names follow the record's type and
/// field names.
#[derive(Serialize)]
#[serde(rename = "SourceEvent")]
struct XmlSourceEvent<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Temperature")]
    temperature: f64,
    #[serde(rename = "Humidity")]
    humidity: f64,
    #[serde(rename = "Time")]
    time: i64,
}

impl<'a> From<&'a SourceEvent> for XmlSourceEvent<'a> {
    fn from(event: &'a SourceEvent) -> Self {
        Self {
            id: &event.id,
            temperature: event.temperature,
            humidity: event.humidity,
            time: event.time,
        }
    }
}

/// Serializes the event as a single XML element.
pub fn to_xml(event: &SourceEvent) -> Result<String, ConversionError> {
    quick_xml::se::to_string(&XmlSourceEvent::from(event))
        .map_err(|e| ConversionError::encode(e.to_string()))
}

/// Formats the event as one CSV line, rendering `time` in `tz`.
///
/// Fails when `time` is outside the range chrono can represent.
pub fn to_csv<Tz>(event: &SourceEvent, tz: &Tz) -> Result<String, ConversionError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let time = tz
        .timestamp_opt(event.time, 0)
        .single()
        .ok_or_else(|| ConversionError::encode(format!("timestamp out of range: {}", event.time)))?;

    Ok(format!(
        "\"{}\",{:.6},{:.6},\"{}\"",
        event.id,
        event.temperature,
        event.humidity,
        time.to_rfc3339_opts(SecondsFormat::Secs, true)
    ))
}
