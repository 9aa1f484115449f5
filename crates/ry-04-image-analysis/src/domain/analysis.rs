//! # Analysis Result Parsing
//!
//! The oracle answers in free text that should contain one JSON object. The
//! content is parsed whole first; failing that, the span from the first `{`
//! to the last `}` is parsed.

use super::errors::AnalysisError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared_types::Tag;

/// Validated analysis of one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub is_photoreal: bool,
    pub photo_description: String,
    /// Only members of the tag enumeration.
    pub list_of_tags: Vec<Tag>,
}

const REQUIRED_KEYS: [&str; 3] = ["isPhotoreal", "photoDescription", "listOfTags"];

/// Parse and validate oracle output.
pub fn parse_analysis(content: &str) -> Result<AnalysisResult, AnalysisError> {
    let value = match serde_json::from_str::<Value>(content) {
        Ok(value) => value,
        Err(_) => extract_object(content)?,
    };

    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(AnalysisError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                type_name(&other)
            )))
        }
    };

    for key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            return Err(AnalysisError::MalformedResponse(format!("missing key {}", key)));
        }
    }

    Ok(from_object(object))
}

fn extract_object(content: &str) -> Result<Value, AnalysisError> {
    let (start, end) = match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            return Err(AnalysisError::MalformedResponse(
                "no JSON object in response".to_string(),
            ))
        }
    };

    serde_json::from_str(&content[start..=end])
        .map_err(|e| AnalysisError::MalformedResponse(format!("invalid JSON: {}", e)))
}

fn from_object(mut object: Map<String, Value>) -> AnalysisResult {
    let is_photoreal = object.get("isPhotoreal").map(truthy).unwrap_or(false);
    let photo_description = match object.remove("photoDescription") {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    // A lone value becomes a one-element list, dropped when falsy
    let raw_tags = match object.remove("listOfTags") {
        Some(Value::Array(items)) => items,
        Some(other) if truthy(&other) => vec![other],
        _ => Vec::new(),
    };
    let list_of_tags = raw_tags
        .iter()
        .filter_map(Value::as_str)
        .filter_map(Tag::from_label)
        .collect();

    AnalysisResult {
        is_photoreal,
        photo_description,
        list_of_tags,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
