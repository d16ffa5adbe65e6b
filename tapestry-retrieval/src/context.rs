//! Context text assembly from accumulated evidence.
//!
//! Builds the numbered context block handed to the chat model and the
//! source references included in responses.

use tapestry_core::{Evidence, SourceRef};

/// Truncate `text` to at most `max_chars` characters, respecting UTF-8
/// boundaries.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Assembles prompt context and provenance from retrieved evidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextBuilder;

impl ContextBuilder {
    /// Create a new context builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build a numbered context block from evidence units.
    ///
    /// When `include_graph_context` is set, related entity names attached by
    /// hybrid retrieval are appended to each unit.
    #[must_use]
    pub fn build_context_text(&self, results: &[Evidence], include_graph_context: bool) -> String {
        results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                let heading = result.title.as_deref().unwrap_or(&result.source_id);
                let mut text = format!("[{}] {}\n{}", i + 1, heading, result.content);

                if include_graph_context {
                    if let Some(graph_context) = &result.graph_context {
                        if let Some(names) = graph_context.related_names() {
                            text.push_str(&format!("\n\nRelated entities: {names}"));
                        }
                    }
                }

                text
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Produce the source references for a response.
    #[must_use]
    pub fn format_sources(&self, results: &[Evidence]) -> Vec<SourceRef> {
        results.iter().map(Evidence::to_source_ref).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapestry_core::{GraphContext, GraphEntity, Provenance, VectorHit};

    fn evidence(id: &str, title: Option<&str>, content: &str) -> Evidence {
        Evidence::from_hit(
            VectorHit {
                source_id: id.to_string(),
                title: title.map(String::from),
                content: content.to_string(),
                score: 0.8,
                origin: None,
            },
            Provenance::Vector,
        )
    }

    #[test]
    fn test_numbered_context() {
        let builder = ContextBuilder::new();
        let results = vec![
            evidence("a", Some("First"), "alpha"),
            evidence("b", Some("Second"), "beta"),
        ];

        let text = builder.build_context_text(&results, false);
        assert!(text.starts_with("[1] First\nalpha"));
        assert!(text.contains("[2] Second\nbeta"));
    }

    #[test]
    fn test_heading_falls_back_to_source_id() {
        let builder = ContextBuilder::new();
        let text = builder.build_context_text(&[evidence("doc-9", None, "body")], false);
        assert!(text.starts_with("[1] doc-9"));
    }

    #[test]
    fn test_graph_context_included_only_when_enabled() {
        let builder = ContextBuilder::new();
        let graph_context = GraphContext {
            entity: GraphEntity::new("e1", None),
            related: vec![GraphEntity::new("e2", Some("Service Mesh".to_string()))],
            relationships: vec![],
        };
        let results =
            vec![evidence("a", None, "alpha").with_graph_context(Some(graph_context))];

        let with = builder.build_context_text(&results, true);
        assert!(with.contains("Related entities: Service Mesh"));

        let without = builder.build_context_text(&results, false);
        assert!(!without.contains("Related entities"));
    }

    #[test]
    fn test_truncate_chars_respects_utf8() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
