// src/normalize/mod.rs
use crate::config::Config;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

static PRICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.?\d*").unwrap());
static TRAILING_QUALIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(organic|label|ipm|conventional|bunch|loose)\s*$").unwrap()
});

/// One cleaned row of the produce listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProduceRecord {
    /// Original listing text from the name column.
    pub raw: String,
    /// Canonical item name, qualifiers and price suffixes stripped.
    pub item: String,
    pub price: f64,
    pub origin: String,
    pub is_local: bool,
    /// Organic-flag text as listed, unprocessed.
    pub is_organic: String,
    /// Any other table columns, under their snake_case keys.
    pub extra: BTreeMap<String, String>,
}

/// First integer-or-decimal number in the text, if any.
pub fn clean_price(price_str: &str) -> Option<f64> {
    PRICE_RE
        .find(price_str)
        .and_then(|m| m.as_str().parse().ok())
}

/// Containment match against the configured markers. Not word-boundary
/// based: "NC" also matches inside a longer token. Known quirk, kept for
/// compatibility with the listing's historical classification.
pub fn is_local(origin: &str, indicators: &[String]) -> bool {
    indicators.iter().any(|marker| origin.contains(marker.as_str()))
}

/// Everything before the first hyphen or dollar sign, with one trailing
/// qualifier word ("organic", "bunch", ...) stripped.
pub fn extract_item(raw_name: &str) -> String {
    let head = raw_name.split(['-', '$']).next().unwrap_or(raw_name).trim();
    TRAILING_QUALIFIER_RE.replace(head, "").trim().to_string()
}

/// Turn an extracted row into a record, or `None` to drop it. The only
/// drop condition is a price field with no parseable number, which is how
/// blank and "call for price" rows show up.
pub fn normalize(mut row: BTreeMap<String, String>, config: &Config) -> Option<ProduceRecord> {
    let price_text = row.remove("price").unwrap_or_default();
    let price = match clean_price(&price_text) {
        Some(price) => price,
        None => {
            debug!(price = %price_text, "dropping row with unparseable price");
            return None;
        }
    };

    let raw = row.remove("name").unwrap_or_default().trim().to_string();
    let origin = row.remove("origin").unwrap_or_default().trim().to_string();
    let is_organic = row.remove("organic").unwrap_or_default().trim().to_string();

    Some(ProduceRecord {
        item: extract_item(&raw),
        is_local: is_local(&origin, &config.local_indicators),
        raw,
        price,
        origin,
        is_organic,
        extra: row
            .into_iter()
            .map(|(k, v)| (k, v.trim().to_string()))
            .collect(),
    })
}
