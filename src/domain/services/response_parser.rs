//! Turns raw model completions into typed results.
//!
//! The model is asked for a comma-separated list (suggestions) or a bare
//! JSON array (conditions), but it regularly wraps answers in markdown code
//! fences or prefixes them with a `json` label. Everything here is total:
//! callers get either a value or a classified [`ParseFailure`], never a panic.

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{ParseFailure, SlopeRecord, SuggestionList};

const CODE_FENCE: &str = "```";
const JSON_LABEL: &str = "json";

/// Split a comma-separated completion into at most five city names.
///
/// Any non-empty trimmed token is accepted: the model is trusted for the
/// shape of its answer, not its content.
pub fn parse_suggestions(raw: &str) -> SuggestionList {
    SuggestionList::from_items(raw.split(','))
}

/// Strip formatting the model adds around a JSON payload.
///
/// Removes an opening code fence with its optional language tag and a
/// closing fence, then a leading `json` label (case-insensitive). Clean
/// input passes through unchanged apart from outer whitespace.
pub fn sanitize(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix(CODE_FENCE) {
        let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
        let rest = rest.trim_start();
        text = rest.strip_suffix(CODE_FENCE).unwrap_or(rest).trim();
    }

    if text
        .get(..JSON_LABEL.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(JSON_LABEL))
    {
        text = text[JSON_LABEL.len()..].trim();
    }

    text.to_string()
}

/// Sanitize and parse a conditions completion into slope records.
///
/// Array elements are accepted as they come; missing fields are a rendering
/// concern. Anything other than a JSON array is a [`ParseFailure`] carrying
/// the sanitized text.
pub fn parse_conditions(raw: &str) -> Result<Vec<SlopeRecord>, ParseFailure> {
    let cleaned = sanitize(raw);

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Array(items)) => {
            debug!("Parsed {} slope records", items.len());
            Ok(items.iter().map(SlopeRecord::from_value).collect())
        }
        Ok(other) => {
            warn!(
                "Unexpected ski conditions format (expected an array, got {})",
                json_type_name(&other)
            );
            Err(ParseFailure::unexpected_shape(
                cleaned,
                format!("expected an array of slopes, got {}", json_type_name(&other)),
            ))
        }
        Err(e) => {
            warn!("Failed to parse ski conditions JSON: {e}. Raw text: {cleaned}");
            Err(ParseFailure::malformed_json(cleaned, e.to_string()))
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
