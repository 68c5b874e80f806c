//! Recovers a JSON value from free-form model output.
//!
//! Models wrap their answer in prose and code fences more often than not.
//! Extraction is a single bracket span: the first opening bracket to the last
//! closing bracket, parsed strictly. Nested prose that itself contains
//! brackets, or several JSON fragments in one reply, will fail to parse.

use serde_json::Value;

use crate::error::{ApiError, Result};

const FENCE: &str = "```";

/// Expected top-level shape of the JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Object,
    Array,
}

impl Shape {
    fn brackets(self) -> (char, char) {
        match self {
            Shape::Object => ('{', '}'),
            Shape::Array => ('[', ']'),
        }
    }
}

/// Drops fence markers (and the `tag` directly after an opening fence),
/// keeping the enclosed content. Text without fences is returned as is.
pub fn strip_fences(text: &str, tag: &str) -> String {
    if !text.contains(FENCE) {
        return text.to_string();
    }

    text.replace(&format!("{}{}", FENCE, tag), "")
        .replace(FENCE, "")
        .trim()
        .to_string()
}

pub fn extract_json(text: &str, shape: Shape) -> Result<Value> {
    let cleaned = strip_fences(text, "json");
    let (open, close) = shape.brackets();

    let span = match (cleaned.find(open), cleaned.rfind(close)) {
        (Some(start), Some(end)) if start < end => &cleaned[start..=end],
        _ => return Err(ApiError::NoStructuredDataFound),
    };

    serde_json::from_str(span).map_err(|e| ApiError::MalformedStructuredData(e.to_string()))
}
