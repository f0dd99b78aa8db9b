//! Planning entry point.
//!
//! A [`Planner`] owns a shared [`FormatGraph`], a [`WorkflowCatalog`] and a
//! [`PlannerConfig`]. [`Planner::plan`] runs the whole pipeline for one
//! request and always returns a [`ConversionResult`]:
//!
//! ```text
//! (source, target, size)
//!  │
//!  ├─ 1. Normalise   trim, strip '.', lowercase, resolve aliases
//!  ├─ 2. Domain      both endpoints must belong to the planner's domain
//!  ├─ 3. Classify    first matching workflow template (workflow-aware only)
//!  ├─ 4. Search      bounded BFS up to the (possibly relaxed) hop ceiling
//!  ├─ 5. Estimate    quality, time, advisories, justification per route
//!  ├─ 6. Rank        triggered workflow first, then steps ↑, quality ↓
//!  └─ 7. Assemble    primary + capped alternatives + recommendation
//! ```
//!
//! Planners are immutable after construction and `Send + Sync`; share one
//! across threads behind an `Arc` or clone it (the tables are `Arc`ed).

use crate::config::{self, PlannerConfig};
use crate::describe;
use crate::error::{PlanError, RouteError};
use crate::estimate::{self, Advisory, QualityModel, TimeModel, TRIVIAL_QUALITY};
use crate::graph::FormatGraph;
use crate::output::{ConversionPath, ConversionResult};
use crate::search::{self, SearchParams};
use crate::workflow::{justify, WorkflowCatalog, WorkflowTemplate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A normalised format token: lowercase alphanumerics plus `+ _ -`.
static RE_FORMAT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9+_-]*$").unwrap());

/// Route planner over a format graph.
///
/// # Example
/// ```rust
/// use formatroute::Planner;
///
/// let planner = Planner::general_purpose().unwrap();
/// let result = planner.plan("jpg", "pdf", None);
/// assert!(result.success);
/// assert_eq!(result.primary_path.unwrap().path, vec!["jpg", "pdf"]);
/// ```
#[derive(Debug, Clone)]
pub struct Planner {
    graph: Arc<FormatGraph>,
    workflows: Arc<WorkflowCatalog>,
    config: PlannerConfig,
}

impl Planner {
    /// Build a planner from explicit parts.
    ///
    /// # Errors
    /// - [`RouteError::InvalidConfig`] — `config` violates a cross-field constraint
    /// - [`RouteError::InvalidWorkflow`] / [`RouteError::UnknownFormat`] — a
    ///   template does not fit `graph`, or (workflow-aware configs) its route
    ///   cannot be discovered in the planner's domain within the relaxed ceiling
    pub fn new(
        graph: Arc<FormatGraph>,
        workflows: Arc<WorkflowCatalog>,
        config: PlannerConfig,
    ) -> Result<Self, RouteError> {
        config::validate(&config)?;
        workflows.validate(&graph)?;
        if config.workflow_aware {
            workflows.check_discoverable(
                &graph,
                config.domain,
                config.hop_ceiling(true),
                config.max_expansions,
            )?;
        }
        debug!(
            "Planner ready: {} formats, {} edges, {} workflows, domain {}",
            graph.len(),
            graph.edge_count(),
            workflows.len(),
            config.domain
        );
        Ok(Self {
            graph,
            workflows,
            config,
        })
    }

    /// Built-in graph and workflows with the given config.
    pub fn with_config(config: PlannerConfig) -> Result<Self, RouteError> {
        Self::new(
            FormatGraph::builtin()?,
            Arc::new(WorkflowCatalog::builtin()),
            config,
        )
    }

    /// Shortest routes in the general domain, no workflow templates.
    pub fn general_purpose() -> Result<Self, RouteError> {
        Self::with_config(PlannerConfig::general_purpose())
    }

    /// General domain with workflow templates and three alternatives.
    pub fn professional() -> Result<Self, RouteError> {
        Self::with_config(PlannerConfig::professional())
    }

    /// E-book domain.
    pub fn ebook() -> Result<Self, RouteError> {
        Self::with_config(PlannerConfig::ebook())
    }

    pub fn graph(&self) -> &FormatGraph {
        &self.graph
    }

    pub fn workflows(&self) -> &WorkflowCatalog {
        &self.workflows
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a conversion from `source` to `target`.
    ///
    /// Never panics and never returns an error: failures are reported through
    /// [`ConversionResult::error`] with a recommendation where one applies.
    /// Identical inputs always produce identical results.
    pub fn plan(&self, source: &str, target: &str, file_size: Option<u64>) -> ConversionResult {
        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.plan_routes(source, target, file_size)
        }));

        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(error)) => self.failure(error),
            Err(payload) => self.failure(PlanError::InternalComputation {
                detail: panic_detail(payload.as_ref()),
            }),
        };

        debug!(
            "Planned {} → {} in {}µs (success: {})",
            source,
            target,
            start.elapsed().as_micros(),
            result.success
        );
        result
    }

    fn plan_routes(
        &self,
        source: &str,
        target: &str,
        file_size: Option<u64>,
    ) -> Result<ConversionResult, PlanError> {
        // ── Step 1: Normalise input ──────────────────────────────────────────
        let source = self.resolve_format(source, "source")?;
        let target = self.resolve_format(target, "target")?;

        // ── Step 2: Domain filter ────────────────────────────────────────────
        let domain = self.config.domain;
        for format in [&source, &target] {
            if !self.graph.in_domain(format, domain) {
                return Err(PlanError::DomainRejected {
                    format: format.clone(),
                    domain,
                });
            }
        }

        // ── Step 3: Workflow classification ──────────────────────────────────
        let template = if self.config.workflow_aware {
            self.workflows.classify(&source, &target, file_size)
        } else {
            None
        };
        if let Some(t) = template {
            debug!("Workflow '{}' triggered for {} → {}", t.name, source, target);
        }

        // ── Step 4: Search ───────────────────────────────────────────────────
        let max_hops = self.config.hop_ceiling(template.is_some());
        let params = SearchParams {
            source: &source,
            target: &target,
            domain,
            max_hops,
            max_expansions: self.config.max_expansions,
        };
        let found = search::find_paths(&self.graph, &params).map_err(|e| {
            PlanError::InternalComputation {
                detail: format!("search budget exhausted after {} expansions", e.expansions),
            }
        })?;
        if found.is_empty() {
            return Err(PlanError::NoRouteFound {
                source_format: source,
                target_format: target,
                max_hops,
            });
        }
        let total_routes_found = found.len();

        // ── Step 5: Estimate ─────────────────────────────────────────────────
        let mut paths: Vec<ConversionPath> = found
            .into_iter()
            .map(|p| self.build_path(p.formats, template))
            .collect();

        // ── Step 6: Rank ─────────────────────────────────────────────────────
        rank(&mut paths);

        // ── Step 7: Assemble ─────────────────────────────────────────────────
        let mut ranked = paths.into_iter();
        let primary = ranked.next().ok_or_else(|| PlanError::InternalComputation {
            detail: "ranking dropped every route".to_string(),
        })?;
        let alternatives: Vec<ConversionPath> =
            ranked.take(self.config.max_alternatives).collect();
        let recommendation = describe::success_recommendation(&primary);

        info!(
            "Route {} → {}: {} steps, quality {}, {} of {} routes returned{}",
            source,
            target,
            primary.steps,
            primary.estimated_quality,
            1 + alternatives.len(),
            total_routes_found,
            primary
                .workflow
                .as_deref()
                .map(|w| format!(" (workflow {w})"))
                .unwrap_or_default()
        );

        Ok(ConversionResult::found(
            primary,
            alternatives,
            total_routes_found,
            recommendation,
        ))
    }

    /// Normalise a raw token and resolve it to a canonical graph identifier.
    fn resolve_format(&self, raw: &str, role: &str) -> Result<String, PlanError> {
        let token = normalise_format(raw);
        if token.is_empty() {
            return Err(PlanError::InvalidInput {
                reason: format!("{role} format is empty"),
            });
        }
        if !RE_FORMAT_TOKEN.is_match(&token) {
            return Err(PlanError::InvalidInput {
                reason: format!("{role} format '{}' is not a file extension", raw.trim()),
            });
        }
        let canonical = self.graph.resolve(&token).map(str::to_string);
        canonical.ok_or(PlanError::DomainRejected {
            format: token,
            domain: self.config.domain,
        })
    }

    fn build_path(
        &self,
        formats: Vec<String>,
        template: Option<&WorkflowTemplate>,
    ) -> ConversionPath {
        let steps = formats.len().saturating_sub(1);
        let workflow = template.filter(|t| t.matches_route(&formats));

        let (quality, time) = match (workflow, formats.as_slice()) {
            (Some(t), _) => (
                t.quality_model().estimate(steps),
                t.time_model(&self.config).estimate(steps),
            ),
            (None, [.., from, to]) => (
                QualityModel::for_final_hop(&self.graph, &self.config, from, to).estimate(steps),
                TimeModel::standard(&self.config).estimate(steps),
            ),
            (None, _) => (TRIVIAL_QUALITY, 0),
        };

        let (warning, justification, technical_benefits) = match workflow {
            Some(t) => {
                let advisories = estimate::advisories(&self.config, steps, quality);
                (
                    describe::warning_text(&advisories, false),
                    Some(t.justification.clone()),
                    t.technical_benefits.clone(),
                )
            }
            None => {
                let mut advisories = estimate::advisories(&self.config, steps, quality);
                let mut justification = None;
                if steps >= 3 {
                    let verdict = justify::evaluate(&self.graph, &formats);
                    if verdict.justified {
                        justification = verdict.summary();
                    } else {
                        advisories.push(Advisory::UnjustifiedIntermediates { steps });
                    }
                }
                (describe::warning_text(&advisories, true), justification, Vec::new())
            }
        };

        if let Some(w) = &warning {
            debug!("Route {}: {}", formats.join(" → "), w);
        }

        ConversionPath {
            description: describe::describe_path(&self.graph, &formats, workflow),
            path: formats,
            steps,
            is_optimal: steps == 1,
            is_recommended: steps <= self.config.recommended_max_steps,
            estimated_quality: quality,
            estimated_time_secs: time,
            warning,
            workflow: workflow.map(|t| t.name.clone()),
            is_professional: workflow.is_some(),
            justification,
            technical_benefits,
        }
    }

    fn failure(&self, error: PlanError) -> ConversionResult {
        match &error {
            PlanError::InternalComputation { .. } => warn!("Planning failed: {}", error),
            _ => info!("No plan: {}", error),
        }
        let recommendation =
            describe::failure_recommendation(&self.graph, self.config.domain, &error);
        ConversionResult::failed(error, recommendation)
    }
}

/// Trim whitespace, drop one leading '.', and lowercase.
pub fn normalise_format(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('.')
        .unwrap_or(trimmed)
        .to_ascii_lowercase()
}

/// Workflow routes first, then steps ascending, then quality descending.
fn rank(paths: &mut [ConversionPath]) {
    search::sort_by_steps_then_quality(paths, |p| p.steps, |p| p.estimated_quality);
    paths.sort_by_key(|p| !p.is_professional);
}

fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    let msg = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("planning panicked: {msg}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Domain;

    const MB: u64 = 1024 * 1024;

    fn general() -> Planner {
        Planner::general_purpose().unwrap()
    }

    fn professional() -> Planner {
        Planner::professional().unwrap()
    }

    fn primary(result: &ConversionResult) -> &ConversionPath {
        result.primary_path.as_ref().expect("primary path")
    }

    // ── Success paths ────────────────────────────────────────────────────

    #[test]
    fn direct_edge_is_optimal() {
        let r = general().plan("jpg", "pdf", None);
        assert!(r.success);
        let p = primary(&r);
        assert_eq!(p.path, vec!["jpg", "pdf"]);
        assert_eq!(p.steps, 1);
        assert!(p.is_optimal);
        assert!(p.is_recommended);
        assert_eq!(p.estimated_quality, 95);
        assert_eq!(p.estimated_time_secs, 5);
        assert!(p.warning.is_none());
        assert!(r.error.is_none());
    }

    #[test]
    fn same_format_is_zero_steps() {
        let r = general().plan("pdf", "PDF", None);
        let p = primary(&r);
        assert_eq!(p.path, vec!["pdf"]);
        assert_eq!(p.steps, 0);
        assert_eq!(p.estimated_quality, 100);
        assert_eq!(p.estimated_time_secs, 0);
        assert!(!p.is_optimal);
    }

    #[test]
    fn two_step_route_degrades_quality() {
        let r = general().plan("txt", "png", None);
        let p = primary(&r);
        assert_eq!(p.path, vec!["txt", "pdf", "png"]);
        assert_eq!(p.estimated_quality, 82);
        assert!(p.estimated_quality < 90 && p.estimated_quality >= 60);
        assert_eq!(p.estimated_time_secs, 8);
    }

    #[test]
    fn input_is_normalised_and_aliases_resolve() {
        let r = general().plan("  .JPEG ", ".Pdf", None);
        assert_eq!(primary(&r).path, vec!["jpg", "pdf"]);
    }

    #[test]
    fn alternatives_respect_cap() {
        for (planner, cap) in [(general(), 2), (professional(), 3)] {
            for (s, t) in [("wav", "mp3"), ("txt", "html"), ("mp4", "gif"), ("docx", "md")] {
                let r = planner.plan(s, t, Some(60 * MB));
                assert!(r.alternative_paths.len() <= cap, "{s} → {t}");
                assert!(r.total_routes_found >= 1 + r.alternative_paths.len());
            }
        }
    }

    #[test]
    fn alternatives_exclude_primary_and_are_ranked() {
        let r = general().plan("wav", "mp3", None);
        let p = primary(&r);
        assert_eq!(p.path, vec!["wav", "mp3"]);
        for alt in &r.alternative_paths {
            assert_ne!(alt.path, p.path);
            assert!(alt.steps >= p.steps);
        }
    }

    #[test]
    fn plan_is_deterministic() {
        let planner = professional();
        let a = planner.plan("wav", "mp3", Some(60 * MB));
        let b = planner.plan("wav", "mp3", Some(60 * MB));
        assert_eq!(a, b);
    }

    // ── Workflows ────────────────────────────────────────────────────────

    #[test]
    fn audio_mastering_workflow_wins_for_large_wav() {
        let r = professional().plan("wav", "mp3", Some(60 * MB));
        let p = primary(&r);
        assert_eq!(p.workflow.as_deref(), Some("audio_mastering"));
        assert!(p.is_professional);
        assert_eq!(p.path, vec!["wav", "flac", "alac", "mp3"]);
        assert_eq!(p.steps, 3);
        assert_eq!(p.estimated_quality, 79);
        assert_eq!(p.estimated_time_secs, 12 + 2 * 8);
        let w = p.warning.as_deref().expect("low-quality warning");
        assert!(w.contains("estimated quality 79 is below 80"), "got: {w}");
        assert!(!w.contains(describe::DIRECT_ROUTE_HINT));
        assert!(!p.technical_benefits.is_empty());
        assert!(r.recommendation.as_deref().unwrap().contains("audio_mastering"));
    }

    #[test]
    fn small_wav_takes_direct_route_even_when_professional() {
        let r = professional().plan("wav", "mp3", Some(MB));
        let p = primary(&r);
        assert_eq!(p.path, vec!["wav", "mp3"]);
        assert!(!p.is_professional);
        assert!(r.all_paths().all(|p| p.workflow.is_none()));
    }

    #[test]
    fn general_planner_ignores_workflows() {
        let r = general().plan("wav", "mp3", Some(60 * MB));
        assert!(!primary(&r).is_professional);
        assert_eq!(primary(&r).steps, 1);
    }

    #[test]
    fn video_and_print_workflows_trigger() {
        let r = professional().plan("avi", "mp4", Some(600 * MB));
        assert_eq!(primary(&r).workflow.as_deref(), Some("video_mastering"));
        let r = professional().plan("heic", "pdf", Some(25 * MB));
        assert_eq!(primary(&r).workflow.as_deref(), Some("print_preparation"));
    }

    #[test]
    fn unjustified_long_route_is_kept_with_warning() {
        let planner = Planner::with_config(
            PlannerConfig::builder()
                .max_hops(4)
                .max_alternatives(100)
                .build()
                .unwrap(),
        )
        .unwrap();
        let r = planner.plan("wav", "m4a", None);
        let long = r
            .all_paths()
            .find(|p| p.steps >= 3 && p.justification.is_none())
            .expect("an unjustified long route");
        let w = long.warning.as_deref().unwrap();
        assert!(w.contains("no clear technical benefit"), "got: {w}");
        assert!(w.ends_with(describe::DIRECT_ROUTE_HINT));
    }

    #[test]
    fn excess_steps_mark_route_not_recommended() {
        let planner = Planner::with_config(
            PlannerConfig::builder()
                .max_hops(4)
                .max_alternatives(1000)
                .build()
                .unwrap(),
        )
        .unwrap();
        let r = planner.plan("txt", "png", None);
        for p in r.all_paths() {
            assert_eq!(p.is_recommended, p.steps <= 3, "{:?}", p.path);
            if p.steps > 3 {
                assert!(p.warning.is_some());
            }
        }
    }

    // ── Failures ─────────────────────────────────────────────────────────

    #[test]
    fn ebook_format_rejected_by_general_planner() {
        let r = general().plan("epub", "pdf", None);
        assert!(!r.success);
        assert!(r.primary_path.is_none());
        assert!(r.alternative_paths.is_empty());
        assert_eq!(
            r.error,
            Some(PlanError::DomainRejected {
                format: "epub".into(),
                domain: Domain::General,
            })
        );
        assert!(r.recommendation.unwrap().contains("e-book planner"));
    }

    #[test]
    fn ebook_planner_accepts_ebook_formats() {
        let r = Planner::ebook().unwrap().plan("epub", "mobi", None);
        assert!(r.success);
        assert_eq!(primary(&r).path, vec!["epub", "mobi"]);
    }

    #[test]
    fn ebook_planner_rejects_audio() {
        let r = Planner::ebook().unwrap().plan("wav", "mp3", None);
        assert!(matches!(r.error, Some(PlanError::DomainRejected { .. })));
    }

    #[test]
    fn disconnected_categories_have_no_route() {
        let r = general().plan("zip", "mp3", None);
        assert!(!r.success);
        assert!(r.alternative_paths.is_empty());
        assert_eq!(r.total_routes_found, 0);
        assert_eq!(
            r.error,
            Some(PlanError::NoRouteFound {
                source_format: "zip".into(),
                target_format: "mp3".into(),
                max_hops: 4,
            })
        );
    }

    #[test]
    fn unknown_format_is_rejected() {
        let r = general().plan("xyz", "pdf", None);
        assert!(matches!(
            r.error,
            Some(PlanError::DomainRejected { ref format, .. }) if format == "xyz"
        ));
    }

    #[test]
    fn empty_and_malformed_input() {
        let r = general().plan("   ", "pdf", None);
        assert!(matches!(r.error, Some(PlanError::InvalidInput { .. })));
        let r = general().plan("jpg", "p d f", None);
        assert!(matches!(r.error, Some(PlanError::InvalidInput { .. })));
        assert!(r.recommendation.is_some());
    }

    #[test]
    fn exhausted_budget_is_internal_error() {
        let planner =
            Planner::with_config(PlannerConfig::builder().max_expansions(2).build().unwrap())
                .unwrap();
        let r = planner.plan("txt", "png", None);
        assert!(matches!(
            r.error,
            Some(PlanError::InternalComputation { .. })
        ));
    }

    // ── Construction ─────────────────────────────────────────────────────

    #[test]
    fn invalid_config_is_fatal() {
        let config = PlannerConfig {
            max_hops: 0,
            ..PlannerConfig::default()
        };
        assert!(matches!(
            Planner::with_config(config),
            Err(RouteError::InvalidConfig(_))
        ));
    }

    #[test]
    fn planner_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Planner>();
    }

    #[test]
    fn normalise_strips_one_dot() {
        assert_eq!(normalise_format(" .MP3 "), "mp3");
        assert_eq!(normalise_format("..mp3"), ".mp3");
    }

    #[test]
    fn panic_payloads_are_described() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_detail(payload.as_ref()), "planning panicked: boom");
    }
}
