//! The format graph: declared formats, direct conversions, domain filter.
//!
//! A [`FormatGraph`] is built once from a [`GraphSpec`] and never mutated
//! afterwards. Construction is where every referential-integrity problem is
//! reported; once a graph exists, queries cannot fail.
//!
//! Formats are stored in a dense node table and edges as index lists, so the
//! path finder works on `usize` ids and only converts back to strings when it
//! hands paths to callers.
//!
//! ```rust
//! use formatroute::graph::{Domain, FormatGraph};
//!
//! let graph = FormatGraph::builtin().unwrap();
//! assert!(graph.neighbors("jpg").contains(&"pdf"));
//! assert!(graph.in_domain("epub", Domain::Ebook));
//! assert!(!graph.in_domain("epub", Domain::General));
//! ```

pub mod catalog;
pub mod format;
pub mod spec;

pub use format::{Domain, EdgeMeta, FormatCategory, FormatNode};
pub use spec::{EdgeSpec, GraphSpec};

use crate::error::RouteError;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Shared built-in graph, validated on first use.
static BUILTIN: Lazy<Result<Arc<FormatGraph>, String>> = Lazy::new(|| {
    FormatGraph::from_spec(catalog::builtin_spec())
        .map(Arc::new)
        .map_err(|e| e.to_string())
});

/// Immutable, validated format graph.
#[derive(Debug, Clone)]
pub struct FormatGraph {
    nodes: Vec<FormatNode>,
    index: HashMap<String, usize>,
    /// Outgoing neighbours per node, in declaration order.
    adjacency: Vec<Vec<usize>>,
    edge_meta: HashMap<(usize, usize), EdgeMeta>,
    aliases: BTreeMap<String, String>,
    edge_count: usize,
}

impl FormatGraph {
    /// The crate's built-in catalog, shared process-wide.
    pub fn builtin() -> Result<Arc<Self>, RouteError> {
        match &*BUILTIN {
            Ok(graph) => Ok(Arc::clone(graph)),
            Err(msg) => Err(RouteError::InvalidGraph(msg.clone())),
        }
    }

    /// Validate a declarative definition and build the graph.
    ///
    /// # Errors
    /// - [`RouteError::DuplicateFormat`] — a format is declared twice
    /// - [`RouteError::UnknownFormat`] — an edge or alias names an undeclared format
    /// - [`RouteError::DuplicateEdge`] — the same directed edge appears twice
    /// - [`RouteError::InvalidGraph`] — empty/uppercase identifiers, empty
    ///   domain sets, self-loops, quality above 100, aliases shadowing formats
    pub fn from_spec(spec: GraphSpec) -> Result<Self, RouteError> {
        let mut index = HashMap::with_capacity(spec.nodes.len());
        for (i, node) in spec.nodes.iter().enumerate() {
            if node.format.is_empty() || node.format != node.format.to_lowercase() {
                return Err(RouteError::InvalidGraph(format!(
                    "format identifiers must be non-empty lowercase tokens, got '{}'",
                    node.format
                )));
            }
            if node.domains.is_empty() {
                return Err(RouteError::InvalidGraph(format!(
                    "format '{}' belongs to no domain",
                    node.format
                )));
            }
            if index.insert(node.format.clone(), i).is_some() {
                return Err(RouteError::DuplicateFormat {
                    format: node.format.clone(),
                });
            }
        }

        let mut adjacency = vec![Vec::new(); spec.nodes.len()];
        let mut edge_meta = HashMap::new();
        for edge in &spec.edges {
            let context = format!("edge {} → {}", edge.from, edge.to);
            let from = lookup(&index, &edge.from, &context)?;
            let to = lookup(&index, &edge.to, &context)?;
            if from == to {
                return Err(RouteError::InvalidGraph(format!(
                    "self-loop on '{}'",
                    edge.from
                )));
            }
            if adjacency[from].contains(&to) {
                return Err(RouteError::DuplicateEdge {
                    source_format: edge.from.clone(),
                    target_format: edge.to.clone(),
                });
            }
            if let Some(q) = edge.meta.quality {
                if q > 100 {
                    return Err(RouteError::InvalidGraph(format!(
                        "{context}: quality must be 0–100, got {q}"
                    )));
                }
            }
            adjacency[from].push(to);
            if edge.meta != EdgeMeta::default() {
                edge_meta.insert((from, to), edge.meta.clone());
            }
        }

        for (alias, format) in &spec.aliases {
            lookup(&index, format, &format!("alias '{alias}'"))?;
            if index.contains_key(alias) {
                return Err(RouteError::InvalidGraph(format!(
                    "alias '{alias}' shadows a declared format"
                )));
            }
        }

        debug!(
            "Format graph ready: {} formats, {} edges, {} aliases",
            spec.nodes.len(),
            spec.edges.len(),
            spec.aliases.len()
        );

        Ok(Self {
            nodes: spec.nodes,
            index,
            adjacency,
            edge_meta,
            aliases: spec.aliases,
            edge_count: spec.edges.len(),
        })
    }

    /// Number of declared formats.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Look up a declared format (exact identifier, no alias resolution).
    pub fn node(&self, format: &str) -> Option<&FormatNode> {
        self.index.get(format).map(|&i| &self.nodes[i])
    }

    /// Resolve a normalised token to its canonical identifier, following aliases.
    pub fn resolve<'a>(&'a self, token: &'a str) -> Option<&'a str> {
        if let Some(&i) = self.index.get(token) {
            return Some(self.nodes[i].format.as_str());
        }
        self.aliases
            .get(token)
            .and_then(|canonical| self.index.get(canonical))
            .map(|&i| self.nodes[i].format.as_str())
    }

    /// Direct conversion targets of `format`, in declaration order.
    /// Unknown formats have no neighbours.
    pub fn neighbors(&self, format: &str) -> Vec<&str> {
        match self.index.get(format) {
            Some(&i) => self.adjacency[i]
                .iter()
                .map(|&j| self.nodes[j].format.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Whether `format` is declared and routable in `domain`.
    pub fn in_domain(&self, format: &str, domain: Domain) -> bool {
        self.node(format).is_some_and(|n| n.in_domain(domain))
    }

    /// Metadata for the direct edge `from → to`, when the edge carries any.
    pub fn edge_meta(&self, from: &str, to: &str) -> Option<&EdgeMeta> {
        let from = *self.index.get(from)?;
        let to = *self.index.get(to)?;
        self.edge_meta.get(&(from, to))
    }

    /// Whether a direct edge `from → to` exists.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&f), Some(&t)) => self.adjacency[f].contains(&t),
            _ => false,
        }
    }

    /// Declared formats routable in `domain`, in declaration order.
    pub fn formats_in(&self, domain: Domain) -> Vec<&FormatNode> {
        self.nodes.iter().filter(|n| n.in_domain(domain)).collect()
    }

    // ── Index-level access for the path finder ───────────────────────────

    pub(crate) fn index_of(&self, format: &str) -> Option<usize> {
        self.index.get(format).copied()
    }

    pub(crate) fn node_at(&self, idx: usize) -> &FormatNode {
        &self.nodes[idx]
    }

    pub(crate) fn neighbor_ids(&self, idx: usize) -> &[usize] {
        &self.adjacency[idx]
    }
}

fn lookup(index: &HashMap<String, usize>, format: &str, context: &str) -> Result<usize, RouteError> {
    index
        .get(format)
        .copied()
        .ok_or_else(|| RouteError::UnknownFormat {
            format: format.to_string(),
            context: context.to_string(),
        })
}
