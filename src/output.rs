//! Output types returned by [`crate::plan::Planner::plan`].
//!
//! Every planning call yields a [`ConversionResult`], whether it succeeded or
//! not. Failures are carried in [`ConversionResult::error`] together with a
//! human-readable recommendation, so callers can render guidance without
//! matching on a propagated error.

use crate::error::PlanError;
use serde::{Deserialize, Serialize};

/// One candidate route from source to target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionPath {
    /// Formats in order, source and target inclusive.
    pub path: Vec<String>,

    /// Number of conversions, `path.len() - 1`.
    pub steps: usize,

    /// `true` when the route is a single direct conversion.
    pub is_optimal: bool,

    /// `false` when the route exceeds the recommended step count.
    pub is_recommended: bool,

    /// Estimated fidelity retained, 0–100.
    pub estimated_quality: u8,

    /// Estimated processing time in seconds.
    pub estimated_time_secs: u32,

    pub description: String,

    /// Advisory text for long, lossy or unjustified routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,

    /// Name of the professional workflow this route implements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<String>,

    pub is_professional: bool,

    /// Why the intermediates are worth their cost: the workflow rationale for
    /// professional routes, or the justification findings for long ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub technical_benefits: Vec<String>,
}

impl ConversionPath {
    /// Consecutive `(from, to)` pairs along the route.
    pub fn hops(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.path
            .windows(2)
            .map(|w| (w[0].as_str(), w[1].as_str()))
    }

    /// Intermediate formats, excluding source and target.
    pub fn intermediates(&self) -> &[String] {
        match self.path.len() {
            0..=2 => &[],
            n => &self.path[1..n - 1],
        }
    }

    /// `true` when source and target are the same format.
    pub fn is_trivial(&self) -> bool {
        self.steps == 0
    }
}

/// The result of one planning request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub success: bool,

    /// Best route. Present exactly when `success` is true.
    pub primary_path: Option<ConversionPath>,

    /// Next-best routes, capped by the planner's `max_alternatives`.
    pub alternative_paths: Vec<ConversionPath>,

    /// Routes the search discovered before the cap was applied.
    pub total_routes_found: usize,

    /// Present exactly when `success` is false.
    pub error: Option<PlanError>,

    pub recommendation: Option<String>,
}

impl ConversionResult {
    pub(crate) fn found(
        primary: ConversionPath,
        alternatives: Vec<ConversionPath>,
        total_routes_found: usize,
        recommendation: String,
    ) -> Self {
        Self {
            success: true,
            primary_path: Some(primary),
            alternative_paths: alternatives,
            total_routes_found,
            error: None,
            recommendation: Some(recommendation),
        }
    }

    pub(crate) fn failed(error: PlanError, recommendation: Option<String>) -> Self {
        Self {
            success: false,
            primary_path: None,
            alternative_paths: Vec::new(),
            total_routes_found: 0,
            error: Some(error),
            recommendation,
        }
    }

    /// Primary route followed by the alternatives.
    pub fn all_paths(&self) -> impl Iterator<Item = &ConversionPath> {
        self.primary_path.iter().chain(self.alternative_paths.iter())
    }
}
