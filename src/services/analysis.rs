use serde_json::Value;

use super::{
    content::TextExtractor,
    pipeline::Pipeline,
    structured::{extract_json, Shape},
};
use crate::{
    error::{ApiError, Result},
    models::{AnalysisOutcome, ChatMessage, NewIdea},
};

const ANALYSIS_INSTRUCTION: &str = "Identify competitor name and 3 weaknesses. \
Output valid JSON: { \"competitor_name\": \"Name\", \"weaknesses\": [\"Point 1\", \"Point 2\", \"Point 3\"] }";

impl Pipeline {
    /// Scans `url` into a new idea record. Nothing is stored unless every
    /// step succeeds.
    pub async fn analyze(&self, url: &str) -> Result<AnalysisOutcome> {
        tracing::info!("analyzing {}", url);

        let text = TextExtractor::new(self.pages.as_ref(), self.max_content_chars)
            .extract(url)
            .await?;

        let messages = [
            ChatMessage::system(ANALYSIS_INSTRUCTION),
            ChatMessage::user(format!("URL: {}\nContent: {}", url, text)),
        ];
        let reply = self.model.complete(&messages).await?;

        let value = extract_json(&reply, Shape::Object)?;
        let (competitor_name, weaknesses) = parse_analysis(&value)?;

        let id = self
            .store
            .insert(NewIdea {
                source_url: url.to_string(),
                competitor_name: competitor_name.clone(),
                weaknesses: weaknesses.clone(),
            })
            .await?;

        tracing::info!(
            "stored idea {} for {} ({} weaknesses)",
            id,
            competitor_name,
            weaknesses.len()
        );

        Ok(AnalysisOutcome {
            id,
            competitor_name,
            weaknesses,
        })
    }
}

/// Validates the model's record. The weakness count is not enforced, but an
/// empty list is rejected.
fn parse_analysis(value: &Value) -> Result<(String, Vec<String>)> {
    let competitor_name = value
        .get("competitor_name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::MissingRequiredField("competitor_name".into()))?;

    let weaknesses = value
        .get("weaknesses")
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .filter(|items| !items.is_empty())
        .ok_or_else(|| ApiError::MissingRequiredField("weaknesses".into()))?;

    Ok((competitor_name.to_string(), weaknesses))
}
