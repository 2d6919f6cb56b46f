//! Network server webhook payload.

use chrono::{DateTime, Utc};
use rewards::Reading;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Uplink delivered by the LoRaWAN network server.
///
/// Every field is optional on the wire; missing or `null` values become empty
/// and are dealt with by later pipeline stages.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WebhookPayload {
    /// External sensor identifier.
    #[serde(rename = "deviceId", default, deserialize_with = "null_as_empty")]
    pub device_id: String,
    /// Device-reported time, expected as RFC 3339.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub timestamp: String,
    /// Decoded sensor fields keyed by name.
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    /// Undecoded frame payload, if the network server forwards it.
    #[serde(rename = "rawData", default)]
    pub raw_data: Option<String>,
}

impl WebhookPayload {
    /// Decode a payload from a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Extract the four sensor values, defaulting anything unusable to 0.0.
    pub fn reading(&self) -> Reading {
        Reading {
            soil_moisture: self.field("soil_moisture"),
            temperature: self.field("temperature"),
            tilt: self.field("tilt"),
            battery_level: self.field("battery_level"),
        }
    }

    fn field(&self, key: &str) -> f64 {
        self.data
            .as_ref()
            .and_then(|data| data.get(key))
            .map(lenient_f64)
            .unwrap_or(0.0)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Numbers pass through, strings holding a JSON number are parsed, everything
/// else is 0.0.
fn lenient_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => serde_json::from_str::<f64>(s)
            .ok()
            .filter(|f| f.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Parse a device timestamp as RFC 3339 in UTC, falling back to `now`.
pub fn normalize_timestamp(raw: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or(now)
}
