//! The data processing agent.
//!
//! Chooses between deterministic transformation and model-assisted analysis
//! of the auxiliary data based on the request's wording, chaining both when
//! the request is ambiguous.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use tapestry_core::traits::ChatModel;

use crate::agents::Agent;
use crate::error::Result;
use crate::prompts;
use crate::types::{AgentKind, AgentResult, DataProcessingMode, DataReport, ExecutionContext};

/// Keywords that select deterministic processing.
const PROGRAMMATIC_KEYWORDS: [&str; 7] = [
    "filter",
    "transform",
    "aggregate",
    "count",
    "sum",
    "average",
    "sort",
];

/// Keywords that select model-assisted analysis.
const MODEL_KEYWORDS: [&str; 5] = ["analyze", "explain", "summarize", "interpret", "suggest"];

/// Transforms and analyzes auxiliary data.
#[derive(Debug)]
pub struct DataProcessingAgent {
    model: Arc<dyn ChatModel>,
}

impl DataProcessingAgent {
    /// Create a data processing agent.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Decide how to process the request.
    fn determine_mode(prompt: &str, data: Option<&serde_json::Value>) -> DataProcessingMode {
        if data.is_none() {
            return DataProcessingMode::ModelAssisted;
        }

        let lower = prompt.to_lowercase();
        if PROGRAMMATIC_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            return DataProcessingMode::Programmatic;
        }
        if MODEL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            return DataProcessingMode::ModelAssisted;
        }

        DataProcessingMode::Both
    }

    /// Deterministic transformations over the auxiliary data.
    fn process_programmatically(prompt: &str, data: &serde_json::Value) -> serde_json::Value {
        let lower = prompt.to_lowercase();

        if lower.contains("count") {
            let count = match data {
                serde_json::Value::Array(items) => items.len(),
                serde_json::Value::Object(map) => map.len(),
                serde_json::Value::Null => 0,
                _ => 1,
            };
            return serde_json::json!({ "count": count });
        }

        if lower.contains("sum") || lower.contains("average") || lower.contains("aggregate") {
            if let serde_json::Value::Array(items) = data {
                let numbers: Vec<f64> = items
                    .iter()
                    .filter_map(serde_json::Value::as_f64)
                    .collect();
                let sum: f64 = numbers.iter().sum();
                let average = if numbers.is_empty() {
                    0.0
                } else {
                    sum / numbers.len() as f64
                };
                return serde_json::json!({
                    "sum": sum,
                    "average": average,
                    "count": numbers.len(),
                });
            }
        }

        if lower.contains("sort") {
            if let serde_json::Value::Array(items) = data {
                let mut sorted = items.clone();
                sorted.sort_by(|a, b| match (a.as_f64(), b.as_f64()) {
                    (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
                    _ => a.to_string().cmp(&b.to_string()),
                });
                return serde_json::Value::Array(sorted);
            }
        }

        data.clone()
    }

    /// One model call over the serialized data.
    async fn process_with_model(
        &self,
        prompt: &str,
        data: &serde_json::Value,
    ) -> Result<String> {
        let serialized =
            serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
        let answer = self
            .model
            .ask(&prompts::data_analysis_system(&serialized), prompt)
            .await?;
        Ok(answer)
    }
}

#[async_trait]
impl Agent for DataProcessingAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::DataProcessing
    }

    async fn execute(
        &self,
        prompt: &str,
        data: Option<&serde_json::Value>,
        _context: &ExecutionContext,
    ) -> Result<AgentResult> {
        let mode = Self::determine_mode(prompt, data);
        debug!(?mode, "processing data");

        let null = serde_json::Value::Null;
        let data = data.unwrap_or(&null);

        let report = match mode {
            DataProcessingMode::Programmatic => {
                let processed = Self::process_programmatically(prompt, data);
                DataReport {
                    answer: "Data processed programmatically.".to_string(),
                    mode,
                    processed: Some(processed),
                }
            }
            DataProcessingMode::Both => {
                let processed = Self::process_programmatically(prompt, data);
                let answer = self.process_with_model(prompt, &processed).await?;
                DataReport {
                    answer,
                    mode,
                    processed: Some(processed),
                }
            }
            DataProcessingMode::ModelAssisted | DataProcessingMode::None => DataReport {
                answer: self.process_with_model(prompt, data).await?,
                mode: DataProcessingMode::ModelAssisted,
                processed: None,
            },
        };

        Ok(AgentResult::DataProcessing(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_without_data_is_model_assisted() {
        assert_eq!(
            DataProcessingAgent::determine_mode("count the rows", None),
            DataProcessingMode::ModelAssisted
        );
    }

    #[test]
    fn test_mode_keyword_selection() {
        let data = json!([1, 2, 3]);
        assert_eq!(
            DataProcessingAgent::determine_mode("count the entries", Some(&data)),
            DataProcessingMode::Programmatic
        );
        assert_eq!(
            DataProcessingAgent::determine_mode("explain this dataset", Some(&data)),
            DataProcessingMode::ModelAssisted
        );
        assert_eq!(
            DataProcessingAgent::determine_mode("what about this?", Some(&data)),
            DataProcessingMode::Both
        );
    }

    #[test]
    fn test_programmatic_count() {
        let processed = DataProcessingAgent::process_programmatically(
            "count the entries",
            &json!([1, 2, 3, 4]),
        );
        assert_eq!(processed, json!({ "count": 4 }));
    }

    #[test]
    fn test_programmatic_aggregation() {
        let processed = DataProcessingAgent::process_programmatically(
            "sum these values",
            &json!([1.0, 2.0, 3.0]),
        );
        assert_eq!(processed["sum"], json!(6.0));
        assert_eq!(processed["average"], json!(2.0));
    }

    #[test]
    fn test_programmatic_sort() {
        let processed =
            DataProcessingAgent::process_programmatically("sort the list", &json!([3, 1, 2]));
        assert_eq!(processed, json!([1, 2, 3]));
    }

    #[test]
    fn test_programmatic_passthrough() {
        let data = json!({ "keep": "me" });
        let processed = DataProcessingAgent::process_programmatically("filter it", &data);
        assert_eq!(processed, data);
    }
}
