//! Display formatting for prices, confidence, timestamps and labels.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// USD with thousands separators and exactly two decimals: `$45,000.50`.
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Confidence in `[0, 1]` as a percentage with one decimal: `82.0%`.
pub fn format_confidence(confidence: Decimal) -> String {
    let percent = (confidence * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}%", percent)
}

/// Human label for a service timeframe code; unknown codes pass through.
pub fn format_timeframe(code: &str) -> String {
    crate::state::Timeframe::from_code(code)
        .map(|tf| tf.label().to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Relative age of a publication timestamp.
pub fn format_time_ago(published_at: &str, now: DateTime<Utc>) -> String {
    let Ok(published) = DateTime::parse_from_rfc3339(published_at) else {
        return "Recently".to_string();
    };

    let hours = (now - published.with_timezone(&Utc)).num_hours();
    if hours < 1 {
        return "Just now".to_string();
    }
    if hours < 24 {
        return format!("{hours} hour{} ago", plural(hours));
    }
    let days = hours / 24;
    format!("{days} day{} ago", plural(days))
}

/// Display badge derived from an item's first category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Crypto,
    Technology,
    Business,
    Regulation,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Crypto => "Crypto",
            Self::Technology => "Technology",
            Self::Business => "Business",
            Self::Regulation => "Regulation",
        }
    }
}

/// Map categories to a badge by keyword in the first label.
pub fn category_badge(categories: &[String]) -> Badge {
    let Some(first) = categories.first() else {
        return Badge::Crypto;
    };
    let category = first.to_lowercase();

    if category.contains("technology") || category.contains("tech") {
        Badge::Technology
    } else if category.contains("business") || category.contains("finance") {
        Badge::Business
    } else if category.contains("politics") || category.contains("government") {
        Badge::Regulation
    } else {
        Badge::Crypto
    }
}

/// Shorten to at most `max_len` characters, ending in `...` when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn plural(n: i64) -> &'static str {
    if n > 1 { "s" } else { "" }
}
