//! Error types for the formatroute library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`RouteError`] — **Fatal**: the planner cannot be constructed at all
//!   (a graph edge references an undeclared format, a workflow template is
//!   malformed, a graph file cannot be read or parsed). Returned as
//!   `Err(RouteError)` from constructors and loaders, so configuration
//!   mistakes surface at startup rather than at query time.
//!
//! * [`PlanError`] — **Non-fatal**: a single planning request failed (format
//!   outside the planner's domain, no route within the hop ceiling). Stored
//!   inside [`crate::output::ConversionResult`] so callers can render
//!   guidance instead of handling a propagated error.

use crate::graph::Domain;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the formatroute library.
///
/// Per-request failures use [`PlanError`] and are stored in
/// [`crate::output::ConversionResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum RouteError {
    // ── Graph errors ──────────────────────────────────────────────────────
    /// An edge, alias or template references a format that was never declared.
    #[error("Format '{format}' referenced by {context} is not a declared node")]
    UnknownFormat { format: String, context: String },

    /// The same format was declared twice.
    #[error("Format '{format}' is declared more than once")]
    DuplicateFormat { format: String },

    /// The same directed edge was declared twice.
    #[error("Edge {source_format} → {target_format} is declared more than once")]
    DuplicateEdge {
        source_format: String,
        target_format: String,
    },

    /// A node or edge definition is structurally invalid.
    #[error("Invalid graph definition: {0}")]
    InvalidGraph(String),

    // ── Workflow errors ───────────────────────────────────────────────────
    /// A workflow template failed validation against the graph.
    #[error("Invalid workflow template '{name}': {reason}")]
    InvalidWorkflow { name: String, reason: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not read a graph or workflow definition file.
    #[error("Failed to read definition file '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A definition document is not valid JSON for the expected shape.
    #[error("Failed to parse {what}: {source}")]
    ParseFailed {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A non-fatal error for a single planning request.
///
/// Stored in [`crate::output::ConversionResult::error`]; the planner never
/// panics or returns `Err` across its public boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanError {
    /// Source and/or target is outside the planner's configured domain.
    #[error("Format '{format}' is not available in the {domain} domain")]
    DomainRejected { format: String, domain: Domain },

    /// The bounded search exhausted the graph without reaching the target.
    #[error("No conversion route from '{source_format}' to '{target_format}' within {max_hops} steps")]
    NoRouteFound {
        source_format: String,
        target_format: String,
        max_hops: usize,
    },

    /// Degenerate request input (empty or malformed format token).
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Unexpected failure during search or estimation.
    #[error("Internal computation error: {detail}")]
    InternalComputation { detail: String },
}
