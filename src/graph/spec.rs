//! Declarative graph definitions.
//!
//! A [`GraphSpec`] is the serialisable form of a format graph: a node list, a
//! directed edge list with optional metadata, and an alias table. The built-in
//! catalog produces one in code; callers can supply their own as JSON:
//!
//! ```json
//! {
//!   "nodes": [
//!     { "format": "jpg", "category": "image", "domains": ["general"] },
//!     { "format": "pdf", "category": "document", "domains": ["general"], "hub": true }
//!   ],
//!   "edges": [
//!     { "from": "jpg", "to": "pdf", "quality": 95, "description": "Embed image as PDF page" }
//!   ],
//!   "aliases": { "jpeg": "jpg" }
//! }
//! ```
//!
//! Nothing here is validated; [`crate::graph::FormatGraph::from_spec`] owns
//! referential-integrity checks.

use crate::error::RouteError;
use crate::graph::format::{EdgeMeta, FormatNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Serialisable description of a format graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSpec {
    pub nodes: Vec<FormatNode>,
    pub edges: Vec<EdgeSpec>,
    /// Alternative spellings mapped to a declared format (`"jpeg" → "jpg"`).
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

/// One directed edge. Neighbour order follows declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub meta: EdgeMeta,
}

impl EdgeSpec {
    /// Edge without metadata.
    pub fn plain(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            meta: EdgeMeta::default(),
        }
    }
}

impl GraphSpec {
    /// Parse a graph definition from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, RouteError> {
        serde_json::from_str(json).map_err(|e| RouteError::ParseFailed {
            what: "graph definition".to_string(),
            source: e,
        })
    }

    /// Read and parse a JSON graph definition from disk.
    pub async fn load_file(path: impl AsRef<Path>) -> Result<Self, RouteError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RouteError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        let spec = Self::from_json_str(&json)?;
        debug!(
            "Loaded graph definition from {}: {} nodes, {} edges",
            path.display(),
            spec.nodes.len(),
            spec.edges.len()
        );
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::format::{Domain, FormatCategory};

    const SMALL: &str = r#"{
        "nodes": [
            { "format": "jpg", "category": "image", "domains": ["general"] },
            { "format": "pdf", "category": "document", "domains": ["general", "ebook"], "hub": true }
        ],
        "edges": [
            { "from": "jpg", "to": "pdf", "quality": 95, "description": "Embed image" },
            { "from": "pdf", "to": "jpg" }
        ],
        "aliases": { "jpeg": "jpg" }
    }"#;

    #[test]
    fn parse_small_graph() {
        let spec = GraphSpec::from_json_str(SMALL).unwrap();
        assert_eq!(spec.nodes.len(), 2);
        assert_eq!(spec.nodes[1].category, FormatCategory::Document);
        assert!(spec.nodes[1].hub);
        assert!(!spec.nodes[0].hub, "hub defaults to false");
        assert_eq!(spec.nodes[1].domains, vec![Domain::General, Domain::Ebook]);
        assert_eq!(spec.edges[0].meta.quality, Some(95));
        assert_eq!(spec.edges[1].meta, EdgeMeta::default());
        assert_eq!(spec.aliases.get("jpeg").map(String::as_str), Some("jpg"));
    }

    #[test]
    fn parse_rejects_unknown_category() {
        let json = r#"{ "nodes": [{ "format": "x", "category": "hologram", "domains": ["general"] }], "edges": [] }"#;
        let err = GraphSpec::from_json_str(json).unwrap_err();
        assert!(matches!(err, RouteError::ParseFailed { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn load_file_round_trip() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut tmp, SMALL.as_bytes()).unwrap();
        let spec = GraphSpec::load_file(tmp.path()).await.unwrap();
        assert_eq!(spec.edges.len(), 2);
    }

    #[tokio::test]
    async fn load_missing_file_is_read_error() {
        let err = GraphSpec::load_file("/definitely/not/here.json").await.unwrap_err();
        assert!(matches!(err, RouteError::ReadFailed { .. }), "got: {err:?}");
    }
}
