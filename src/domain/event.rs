//! SourceEvent - the inbound sensor reading.
//!
//! Inbound payloads are always JSON. Keys match field names without regard
//! to ASCII case, a repeated key keeps its last value, unknown keys are
//! ignored, and a field that is absent or `null` keeps its zero value.

use std::fmt;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::errors::ConversionError;

/// One decoded inbound event.
///
/// Built fresh from a single payload and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceEvent {
    pub id: String,

    pub temperature: f64,

    pub humidity: f64,

    /// Unix timestamp in seconds.
    pub time: i64,
}

/// Decodes one inbound payload.
///
/// A bare `null` payload decodes to the zero event.
///
/// # Errors
///
/// Returns `ConversionError::Decode` carrying the parser's message when the
/// payload is not valid JSON or a field has the wrong type (a fractional or
/// quoted `time`, a string `temperature`, ...).
pub fn decode(raw: &[u8]) -> Result<SourceEvent, ConversionError> {
    tracing::info!("Source: {}", String::from_utf8_lossy(raw));

    serde_json::from_slice::<Option<SourceEvent>>(raw)
        .map(Option::unwrap_or_default)
        .map_err(ConversionError::Decode)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Temperature,
    Humidity,
    Time,
}

impl Field {
    fn from_key(key: &str) -> Option<Self> {
        [
            ("id", Field::Id),
            ("temperature", Field::Temperature),
            ("humidity", Field::Humidity),
            ("time", Field::Time),
        ]
        .into_iter()
        .find(|(name, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, field)| field)
    }
}

impl<'de> Deserialize<'de> for SourceEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SourceEventVisitor)
    }
}

struct SourceEventVisitor;

impl<'de> Visitor<'de> for SourceEventVisitor {
    type Value = SourceEvent;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<SourceEvent, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut event = SourceEvent::default();

        while let Some(key) = map.next_key::<String>()? {
            // `null` leaves the current value in place.
            match Field::from_key(&key) {
                Some(Field::Id) => {
                    if let Some(id) = map.next_value::<Option<String>>()? {
                        event.id = id;
                    }
                }
                Some(Field::Temperature) => {
                    if let Some(temperature) = map.next_value::<Option<f64>>()? {
                        event.temperature = temperature;
                    }
                }
                Some(Field::Humidity) => {
                    if let Some(humidity) = map.next_value::<Option<f64>>()? {
                        event.humidity = humidity;
                    }
                }
                Some(Field::Time) => {
                    if let Some(time) = map.next_value::<Option<i64>>()? {
                        event.time = time;
                    }
                }
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(event)
    }
}
