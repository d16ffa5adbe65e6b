//! Graph neighborhood types.
//!
//! These types carry the output of the graph traversal collaborator: the
//! entity matching a document, the entities reachable within the traversal
//! depth, and the relationships along the traversed paths.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum number of related entity names surfaced in context text.
const MAX_RELATED_NAMES: usize = 5;

/// A node in the knowledge graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEntity {
    /// Unique entity identifier.
    pub id: String,

    /// Human-readable entity name, if set.
    pub name: Option<String>,

    /// Arbitrary entity properties.
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

impl GraphEntity {
    /// Create an entity with an id and name, no extra properties.
    pub fn new<S: Into<String>>(id: S, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
            properties: HashMap::new(),
        }
    }

    /// The display label for this entity: its name, falling back to its id.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// An edge traversed while collecting a neighborhood.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphRelationship {
    /// Relationship type label.
    pub rel_type: String,

    /// Arbitrary relationship properties.
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

/// The graph neighborhood of one document.
///
/// Returned by [`GraphStore::neighbors`](crate::traits::GraphStore::neighbors);
/// absence is a valid outcome, a source may simply have no graph node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphContext {
    /// The entity keyed by the document's source id.
    pub entity: GraphEntity,

    /// Entities reachable within the traversal depth.
    pub related: Vec<GraphEntity>,

    /// Relationships along the traversed paths.
    pub relationships: Vec<GraphRelationship>,
}

impl GraphContext {
    /// Comma-separated names of the first few related entities, or `None`
    /// when the neighborhood holds no related entities.
    #[must_use]
    pub fn related_names(&self) -> Option<String> {
        if self.related.is_empty() {
            return None;
        }

        let names = self
            .related
            .iter()
            .map(GraphEntity::label)
            .filter(|label| !label.is_empty())
            .take(MAX_RELATED_NAMES)
            .collect::<Vec<_>>()
            .join(", ");

        if names.is_empty() { None } else { Some(names) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_label_falls_back_to_id() {
        let named = GraphEntity::new("e1", Some("Alice".to_string()));
        assert_eq!(named.label(), "Alice");

        let unnamed = GraphEntity::new("e2", None);
        assert_eq!(unnamed.label(), "e2");
    }

    #[test]
    fn test_related_names_empty() {
        let context = GraphContext {
            entity: GraphEntity::new("e1", None),
            related: vec![],
            relationships: vec![],
        };
        assert!(context.related_names().is_none());
    }

    #[test]
    fn test_related_names_caps_at_five() {
        let related = (0..8)
            .map(|i| GraphEntity::new(format!("e{i}"), Some(format!("Entity {i}"))))
            .collect();
        let context = GraphContext {
            entity: GraphEntity::new("root", None),
            related,
            relationships: vec![],
        };

        let names = context.related_names().unwrap();
        assert_eq!(names.split(", ").count(), 5);
        assert!(names.starts_with("Entity 0"));
    }
}
