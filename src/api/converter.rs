//! Data conversion utilities for API responses.

use super::wire::{HealthResponse, PredictResponse, RawPost};
use crate::state::{HealthReport, NewsItem, PredictionResult};
use chrono::{SecondsFormat, Utc};

/// Placeholder title for records that carry none.
pub const UNTITLED: &str = "Untitled";

/// Converts API responses to internal state types.
pub struct DataConverter;

impl DataConverter {
    /// Normalize one raw news record. Never fails: each field falls back
    /// to its default independently.
    pub(crate) fn convert_post(raw: RawPost) -> NewsItem {
        let published_at = present(raw.published_at)
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        let title = present(raw.title).unwrap_or_else(|| UNTITLED.to_string());

        let (source_title, source_url) = match raw.source {
            Some(source) => (present(source.title), present(source.url)),
            None => (None, None),
        };

        let link = present(raw.url).or(source_url).unwrap_or_default();
        let image_url = present(raw.image).or_else(|| present(raw.thumbnail));

        // Source label first, then sentiment; duplicates are kept.
        let categories = source_title
            .into_iter()
            .chain(present(raw.sentiment))
            .collect();

        // Title and timestamp can coincide across articles; the id is best-effort.
        let id = raw
            .id
            .unwrap_or_else(|| format!("{}-{}", title, published_at));

        NewsItem {
            id,
            title,
            link,
            description: raw.description.unwrap_or_default(),
            published_at,
            image_url,
            categories,
        }
    }

    pub(crate) fn convert_health(health: HealthResponse) -> HealthReport {
        HealthReport {
            status: health.status,
            models_loaded: health.models_loaded,
            available_timeframes: health.available_timeframes,
        }
    }

    pub(crate) fn convert_prediction(resp: PredictResponse) -> PredictionResult {
        PredictionResult {
            predicted_price: resp.predicted_price,
            current_price: resp.current_price,
            confidence: resp.confidence,
            timeframe: resp.timeframe,
            status: resp.status,
            message: resp.message,
        }
    }
}

/// Empty strings count as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
