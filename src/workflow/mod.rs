//! Professional workflow templates and the classifier that selects them.
//!
//! A [`WorkflowTemplate`] names a fixed multi-stage route that preserves more
//! fidelity than the shortest path for particular source/target/size
//! combinations. Templates live in a [`WorkflowCatalog`], an ordered list
//! evaluated highest priority first (declaration order among equals); the
//! first template whose [`Trigger`] matches a request wins.
//!
//! When a template is selected the planner relaxes its hop ceiling for that
//! request, and any discovered route equal to the template's route is tagged
//! with the template name and ranked ahead of the plain routes.
//!
//! Routes of three or more steps that match no template go through
//! [`justify::evaluate`] instead.

pub mod builtin;
pub mod justify;

use crate::config::PlannerConfig;
use crate::error::RouteError;
use crate::estimate::{QualityModel, TimeModel, DEFAULT_PROFESSIONAL_BASE_QUALITY};
use crate::graph::{Domain, FormatGraph};
use crate::search::{self, SearchParams};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Condition under which a template applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub source: String,
    pub target: String,
    /// Requests must declare a file size of at least this many bytes.
    /// Zero matches requests without a size.
    #[serde(default)]
    pub min_file_size_bytes: u64,
}

impl Trigger {
    pub fn matches(&self, source: &str, target: &str, file_size: Option<u64>) -> bool {
        if self.source != source || self.target != target {
            return false;
        }
        self.min_file_size_bytes == 0 || file_size.is_some_and(|s| s >= self.min_file_size_bytes)
    }
}

/// A named multi-stage conversion pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTemplate {
    pub name: String,
    /// Higher runs first. Default: 0.
    #[serde(default)]
    pub priority: i32,
    pub trigger: Trigger,
    /// Expected route, source and target inclusive.
    pub route: Vec<String>,
    #[serde(default = "default_base_quality")]
    pub base_quality: u8,
    #[serde(default = "default_step_penalty")]
    pub step_penalty: u8,
    #[serde(default = "default_floor_quality")]
    pub floor_quality: u8,
    /// Processing time added per step beyond the first, in seconds.
    pub step_time_secs: u32,
    pub justification: String,
    #[serde(default)]
    pub technical_benefits: Vec<String>,
}

fn default_base_quality() -> u8 {
    DEFAULT_PROFESSIONAL_BASE_QUALITY
}

fn default_step_penalty() -> u8 {
    8
}

fn default_floor_quality() -> u8 {
    60
}

impl WorkflowTemplate {
    /// Fixed step count of the template route.
    pub fn steps(&self) -> usize {
        self.route.len().saturating_sub(1)
    }

    pub fn matches_route(&self, formats: &[String]) -> bool {
        self.route == formats
    }

    pub fn quality_model(&self) -> QualityModel {
        QualityModel {
            base: self.base_quality,
            step_penalty: self.step_penalty,
            floor: self.floor_quality,
        }
    }

    pub fn time_model(&self, config: &PlannerConfig) -> TimeModel {
        TimeModel::professional(config, self.step_time_secs)
    }

    fn invalid(&self, reason: impl Into<String>) -> RouteError {
        RouteError::InvalidWorkflow {
            name: self.name.clone(),
            reason: reason.into(),
        }
    }

    /// Check the template against a graph.
    fn validate(&self, graph: &FormatGraph) -> Result<(), RouteError> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("name must not be empty"));
        }
        if self.route.len() < 2 {
            return Err(self.invalid("route needs at least one step"));
        }
        if self.route.first() != Some(&self.trigger.source)
            || self.route.last() != Some(&self.trigger.target)
        {
            return Err(self.invalid(format!(
                "route must run from trigger source '{}' to trigger target '{}'",
                self.trigger.source, self.trigger.target
            )));
        }
        let mut seen = HashSet::new();
        for format in &self.route {
            if graph.node(format).is_none() {
                return Err(RouteError::UnknownFormat {
                    format: format.clone(),
                    context: format!("workflow '{}'", self.name),
                });
            }
            if !seen.insert(format) {
                return Err(self.invalid(format!("route visits '{format}' twice")));
            }
        }
        for hop in self.route.windows(2) {
            if !graph.has_edge(&hop[0], &hop[1]) {
                return Err(self.invalid(format!(
                    "route hop {} → {} is not a direct conversion",
                    hop[0], hop[1]
                )));
            }
        }
        if self.base_quality > 100 || self.floor_quality > self.base_quality {
            return Err(self.invalid(format!(
                "quality bounds must satisfy floor ≤ base ≤ 100, got {} / {}",
                self.floor_quality, self.base_quality
            )));
        }
        Ok(())
    }
}

/// Ordered list of workflow templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowCatalog {
    /// Sorted by priority descending (stable for equal priorities).
    templates: Vec<WorkflowTemplate>,
}

impl WorkflowCatalog {
    pub fn new(mut templates: Vec<WorkflowTemplate>) -> Self {
        templates.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self { templates }
    }

    /// The templates shipped with the crate.
    pub fn builtin() -> Self {
        Self::new(builtin::templates())
    }

    /// Parse a JSON array of templates.
    pub fn from_json_str(json: &str) -> Result<Self, RouteError> {
        let templates: Vec<WorkflowTemplate> =
            serde_json::from_str(json).map_err(|e| RouteError::ParseFailed {
                what: "workflow templates".to_string(),
                source: e,
            })?;
        Ok(Self::new(templates))
    }

    /// Read and parse a JSON array of templates from disk.
    pub async fn load_file(path: impl AsRef<Path>) -> Result<Self, RouteError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RouteError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        let catalog = Self::from_json_str(&json)?;
        debug!(
            "Loaded {} workflow templates from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Validate every template against `graph`; names must be unique.
    pub fn validate(&self, graph: &FormatGraph) -> Result<(), RouteError> {
        let mut names = HashSet::new();
        for t in &self.templates {
            if !names.insert(t.name.as_str()) {
                return Err(t.invalid("name is used by more than one template"));
            }
            t.validate(graph)?;
        }
        Ok(())
    }

    /// Check that the path finder returns every template route when searching
    /// `domain` with a ceiling of `max_hops`.
    ///
    /// A route whose intermediate is first reached by a shorter path elsewhere
    /// is pruned by the search and would never be tagged.
    pub fn check_discoverable(
        &self,
        graph: &FormatGraph,
        domain: Domain,
        max_hops: usize,
        max_expansions: usize,
    ) -> Result<(), RouteError> {
        for t in &self.templates {
            if let Some(outside) = t.route.iter().find(|f| !graph.in_domain(f, domain)) {
                return Err(t.invalid(format!(
                    "route format '{outside}' is outside the {domain} domain"
                )));
            }
            if t.steps() > max_hops {
                return Err(t.invalid(format!(
                    "route has {} steps, above the hop ceiling of {max_hops}",
                    t.steps()
                )));
            }
            let params = SearchParams {
                source: &t.trigger.source,
                target: &t.trigger.target,
                domain,
                max_hops,
                max_expansions,
            };
            let found = search::find_paths(graph, &params).map_err(|e| {
                t.invalid(format!(
                    "search budget exhausted after {} expansions",
                    e.expansions
                ))
            })?;
            if !found.iter().any(|p| t.matches_route(&p.formats)) {
                return Err(t.invalid(
                    "route is never discovered: an intermediate is reached sooner by a shorter path",
                ));
            }
        }
        Ok(())
    }

    /// First template, in priority order, whose trigger matches the request.
    pub fn classify(
        &self,
        source: &str,
        target: &str,
        file_size: Option<u64>,
    ) -> Option<&WorkflowTemplate> {
        self.templates
            .iter()
            .find(|t| t.trigger.matches(source, target, file_size))
    }

    pub fn templates(&self) -> &[WorkflowTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
