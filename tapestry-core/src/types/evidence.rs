//! Evidence types produced by retrieval.
//!
//! An [`Evidence`] is one retrieved text unit together with its similarity
//! score and provenance. The `source_id` is stable across retrieval passes
//! and serves as the deduplication key within one retrieval session.

use serde::{Deserialize, Serialize};

use crate::types::graph::GraphContext;

/// Which retrieval strategy produced an evidence unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    /// Pure vector-similarity hit.
    Vector,
    /// Vector hit enriched with graph-neighborhood context.
    GraphAugmented,
}

impl Provenance {
    /// Stable string label used in logs and result metadata.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vector => "vector",
            Self::GraphAugmented => "graph-augmented",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row returned by a vector similarity search.
///
/// This is the raw shape the [`VectorIndex`](crate::traits::VectorIndex)
/// collaborator returns, before any strategy-level enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorHit {
    /// Opaque, stable document identifier.
    pub source_id: String,

    /// Document title, if the store tracks one.
    pub title: Option<String>,

    /// Text content of the retrieved chunk.
    pub content: String,

    /// Similarity score in `[0, 1]`, higher is more similar.
    pub score: f32,

    /// Where the document came from (file path, URL, collection name).
    pub origin: Option<String>,
}

/// One retrieved evidence unit.
///
/// Evidence is the unit of retrieval deduplication: within one retrieval
/// session no two accumulated evidence units share a `source_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    /// Opaque, stable document identifier; the deduplication key.
    pub source_id: String,

    /// Document title, if known.
    pub title: Option<String>,

    /// Text content of the retrieved chunk.
    pub content: String,

    /// Similarity score in `[0, 1]`.
    pub score: f32,

    /// Where the document came from.
    pub origin: Option<String>,

    /// Which strategy produced this unit.
    pub provenance: Provenance,

    /// Graph neighborhood attached by hybrid retrieval, absent when the
    /// source has no graph node or the lookup degraded.
    pub graph_context: Option<GraphContext>,
}

impl Evidence {
    /// Build an evidence unit from a raw vector hit.
    #[must_use]
    pub fn from_hit(hit: VectorHit, provenance: Provenance) -> Self {
        Self {
            source_id: hit.source_id,
            title: hit.title,
            content: hit.content,
            score: hit.score,
            origin: hit.origin,
            provenance,
            graph_context: None,
        }
    }

    /// Attach a graph neighborhood to this evidence unit.
    #[must_use]
    pub fn with_graph_context(mut self, context: Option<GraphContext>) -> Self {
        self.graph_context = context;
        self
    }

    /// Produce the source reference used in responses.
    #[must_use]
    pub fn to_source_ref(&self) -> SourceRef {
        SourceRef {
            source_id: self.source_id.clone(),
            title: self.title.clone(),
            origin: self.origin.clone(),
            score: self.score,
            related_entities: self
                .graph_context
                .as_ref()
                .and_then(GraphContext::related_names),
        }
    }
}

/// A provenance reference included in user-visible responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    /// Opaque document identifier.
    pub source_id: String,

    /// Document title, if known.
    pub title: Option<String>,

    /// Where the document came from.
    pub origin: Option<String>,

    /// Similarity score of the underlying evidence.
    pub score: f32,

    /// Comma-separated names of related graph entities, when hybrid
    /// retrieval attached any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_entities: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str) -> VectorHit {
        VectorHit {
            source_id: id.to_string(),
            title: Some("Title".to_string()),
            content: "content".to_string(),
            score: 0.9,
            origin: Some("docs/readme.md".to_string()),
        }
    }

    #[test]
    fn test_evidence_from_hit() {
        let evidence = Evidence::from_hit(hit("doc-1"), Provenance::Vector);
        assert_eq!(evidence.source_id, "doc-1");
        assert_eq!(evidence.provenance, Provenance::Vector);
        assert!(evidence.graph_context.is_none());
    }

    #[test]
    fn test_source_ref_without_graph_context() {
        let evidence = Evidence::from_hit(hit("doc-2"), Provenance::GraphAugmented);
        let source = evidence.to_source_ref();
        assert_eq!(source.source_id, "doc-2");
        assert!(source.related_entities.is_none());
    }

    #[test]
    fn test_provenance_labels() {
        assert_eq!(Provenance::Vector.as_str(), "vector");
        assert_eq!(Provenance::GraphAugmented.as_str(), "graph-augmented");
    }
}
