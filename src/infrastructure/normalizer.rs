//! Normalization of freeform model output into recognition items
//!
//! Vision models rarely answer with bare JSON; the usual shape is prose with
//! an embedded object. The scanner below pulls out the first balanced JSON
//! object (string- and escape-aware, any nesting depth) and the normalizer
//! coerces whatever fields survive into the canonical item schema.

use chrono::{Days, NaiveDate};
use serde_json::Value;

use crate::domain::{DomainError, RecognitionItem};

/// Fixed confidence score attached to every normalized result.
pub const DEFAULT_CONFIDENCE: f32 = 0.85;

const PLACEHOLDER_NAME: &str = "Unknown";

/// Extract the first balanced JSON object from freeform text.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (index, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(index);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start?..=index]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse and canonicalize model output.
///
/// Accepts `{"items": [...]}` or a single flat item object (promoted to a
/// one-element list). Missing or bogus fields get defaults; an expiry date is
/// backfilled from `shelfLifeDays` relative to `today` when absent.
pub fn normalize(
    content: &str,
    fallback_category: &str,
    today: NaiveDate,
) -> Result<Vec<RecognitionItem>, DomainError> {
    let snippet = extract_json_object(content)
        .ok_or_else(|| DomainError::upstream_format("No JSON object in model output"))?;

    let parsed: Value = serde_json::from_str(snippet)
        .map_err(|e| DomainError::upstream_format(format!("Invalid JSON in model output: {}", e)))?;

    let raw_items: Vec<&Value> = match parsed.get("items").and_then(Value::as_array) {
        Some(items) => items.iter().collect(),
        // Single-item responses come back flat; promote to a list.
        None if parsed.get("name").is_some() => vec![&parsed],
        None => vec![],
    };

    Ok(raw_items
        .into_iter()
        .map(|raw| normalize_item(raw, fallback_category, today))
        .collect())
}

fn normalize_item(raw: &Value, fallback_category: &str, today: NaiveDate) -> RecognitionItem {
    let name = string_field(raw, "name")
        .unwrap_or(PLACEHOLDER_NAME)
        .to_string();
    let category = string_field(raw, "category")
        .unwrap_or(fallback_category)
        .to_string();

    let shelf_life_days = int_field(raw, "shelfLifeDays");
    let expiry_date = date_field(raw, "expiryDate").or_else(|| {
        shelf_life_days.and_then(|days| today.checked_add_days(Days::new(u64::from(days))))
    });
    let production_date = date_field(raw, "productionDate");

    let quantity = int_field(raw, "quantity").filter(|q| *q >= 1).unwrap_or(1);

    RecognitionItem {
        name,
        category,
        expiry_date,
        production_date,
        shelf_life_days,
        quantity,
    }
}

fn string_field<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Models sometimes quote numbers; accept both forms.
fn int_field(raw: &Value, key: &str) -> Option<u32> {
    match raw.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn date_field(raw: &Value, key: &str) -> Option<NaiveDate> {
    raw.get(key)
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}
