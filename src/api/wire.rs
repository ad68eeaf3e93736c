//! Raw response shapes for both remote services.
//!
//! The news wire types never reject a record: a field holding an unexpected
//! JSON type deserializes as absent.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Envelope of the posts endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PostsEnvelope {
    pub(crate) results: Option<Vec<Value>>,
    /// Some variants return the records under `data`.
    pub(crate) data: Option<Vec<Value>>,
    #[serde(deserialize_with = "lenient_string")]
    pub(crate) next: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    #[allow(dead_code)]
    pub(crate) previous: Option<String>,
    #[allow(dead_code)]
    pub(crate) count: Option<Value>,
}

impl PostsEnvelope {
    /// The record array, from `results` first, then `data`.
    pub(crate) fn into_records(self) -> (Vec<RawPost>, Option<String>) {
        let records = self
            .results
            .or(self.data)
            .unwrap_or_default()
            .into_iter()
            .map(RawPost::from_value)
            .collect();
        (records, self.next)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawPost {
    #[serde(deserialize_with = "lenient_id")]
    pub(crate) id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub(crate) title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub(crate) description: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub(crate) url: Option<String>,
    #[serde(deserialize_with = "lenient_source")]
    pub(crate) source: Option<RawSource>,
    #[serde(deserialize_with = "lenient_string")]
    pub(crate) published_at: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub(crate) image: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub(crate) thumbnail: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub(crate) sentiment: Option<String>,
}

impl RawPost {
    /// A record that is not an object at all normalizes as an empty one.
    pub(crate) fn from_value(value: Value) -> Self {
        // Arrays would otherwise map onto the fields by position.
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawSource {
    #[serde(deserialize_with = "lenient_string")]
    pub(crate) title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    #[allow(dead_code)]
    pub(crate) domain: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub(crate) url: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_source<'de, D>(deserializer: D) -> Result<Option<RawSource>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_object() {
        Ok(serde_json::from_value(value).ok())
    } else {
        Ok(None)
    }
}

/* ---------------- prediction service ---------------- */

#[derive(Debug, Deserialize)]
pub(crate) struct HealthResponse {
    #[serde(default)]
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) models_loaded: bool,
    #[serde(default)]
    pub(crate) available_timeframes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PredictRequest<'a> {
    pub(crate) timeframe: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PredictResponse {
    pub(crate) predicted_price: Decimal,
    pub(crate) confidence: Decimal,
    pub(crate) current_price: Decimal,
    #[serde(default)]
    pub(crate) timeframe: String,
    #[serde(default)]
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) message: String,
}

/// Error body of the prediction service.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) detail: Option<Value>,
}

impl ErrorBody {
    pub(crate) fn detail_message(&self) -> Option<String> {
        match &self.detail {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}
