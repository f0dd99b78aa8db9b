//! Configuration types for route planning.
//!
//! All planner behaviour is controlled through [`PlannerConfig`], built via
//! its [`PlannerConfigBuilder`] or taken from one of the presets:
//!
//! | Preset | Domain | Workflows | Alternatives |
//! |--------|--------|-----------|--------------|
//! | [`PlannerConfig::general_purpose`] | general | off | 2 |
//! | [`PlannerConfig::professional`]    | general | on  | 3 |
//! | [`PlannerConfig::ebook`]           | e-book  | off | 2 |
//!
//! The config is plain data: cloneable, serialisable, and shared read-only
//! by every planning call.

use crate::error::RouteError;
use crate::graph::Domain;
use serde::{Deserialize, Serialize};

/// Hard upper bound on any hop ceiling.
pub const MAX_HOP_LIMIT: usize = 8;

/// Configuration for a [`crate::plan::Planner`] instance.
///
/// # Example
/// ```rust
/// use formatroute::PlannerConfig;
///
/// let config = PlannerConfig::builder()
///     .max_hops(3)
///     .max_alternatives(5)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_hops, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Domain every format on a route must belong to. Default: general.
    pub domain: Domain,

    /// Hop ceiling for ordinary requests. Default: 4.
    pub max_hops: usize,

    /// Hop ceiling when a workflow trigger matches the request. Default: 5.
    pub relaxed_max_hops: usize,

    /// Routes with more steps than this are flagged `is_recommended = false`
    /// and carry an advisory. Default: 3.
    pub recommended_max_steps: usize,

    /// Evaluate professional workflow templates. Default: false.
    pub workflow_aware: bool,

    /// Maximum number of alternative routes returned beside the primary. Default: 2.
    pub max_alternatives: usize,

    /// Base quality used when the final hop has no quality entry. Default: 90.
    pub default_base_quality: u8,

    /// Quality lost per step beyond the first. Default: 8.
    pub step_penalty: u8,

    /// Estimated quality never drops below this. Default: 60.
    pub floor_quality: u8,

    /// Routes estimated below this quality carry an advisory. Default: 80.
    pub quality_warning_threshold: u8,

    /// Fixed overhead of a standard route, in seconds. Default: 5.
    pub base_time_secs: u32,

    /// Added per standard step beyond the first, in seconds. Default: 3.
    pub per_step_time_secs: u32,

    /// Fixed overhead of a professional workflow, in seconds. Default: 12.
    /// Per-step cost comes from the template.
    pub professional_base_time_secs: u32,

    /// Queue pops allowed per search before the request fails with an
    /// internal computation error. Default: 50 000.
    pub max_expansions: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            domain: Domain::General,
            max_hops: 4,
            relaxed_max_hops: 5,
            recommended_max_steps: 3,
            workflow_aware: false,
            max_alternatives: 2,
            default_base_quality: 90,
            step_penalty: 8,
            floor_quality: 60,
            quality_warning_threshold: 80,
            base_time_secs: 5,
            per_step_time_secs: 3,
            professional_base_time_secs: 12,
            max_expansions: 50_000,
        }
    }
}

impl PlannerConfig {
    /// Create a new builder starting from the general-purpose defaults.
    pub fn builder() -> PlannerConfigBuilder {
        PlannerConfigBuilder {
            config: Self::default(),
        }
    }

    /// General-purpose planner: shortest routes, no workflow templates.
    pub fn general_purpose() -> Self {
        Self::default()
    }

    /// Professional-aware planner: evaluates workflow templates and returns
    /// up to three alternatives.
    pub fn professional() -> Self {
        Self {
            workflow_aware: true,
            max_alternatives: 3,
            ..Self::default()
        }
    }

    /// Planner restricted to the e-book domain.
    pub fn ebook() -> Self {
        Self {
            domain: Domain::Ebook,
            ..Self::default()
        }
    }

    /// Hop ceiling for a request, depending on whether a workflow matched.
    pub fn hop_ceiling(&self, workflow_triggered: bool) -> usize {
        if workflow_triggered {
            self.relaxed_max_hops
        } else {
            self.max_hops
        }
    }
}

/// Builder for [`PlannerConfig`].
#[derive(Debug)]
pub struct PlannerConfigBuilder {
    config: PlannerConfig,
}

impl PlannerConfigBuilder {
    /// Start from an existing config (e.g. a preset).
    pub fn from_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn domain(mut self, domain: Domain) -> Self {
        self.config.domain = domain;
        self
    }

    pub fn max_hops(mut self, n: usize) -> Self {
        self.config.max_hops = n.clamp(1, MAX_HOP_LIMIT);
        self
    }

    pub fn relaxed_max_hops(mut self, n: usize) -> Self {
        self.config.relaxed_max_hops = n.clamp(1, MAX_HOP_LIMIT);
        self
    }

    pub fn recommended_max_steps(mut self, n: usize) -> Self {
        self.config.recommended_max_steps = n.max(1);
        self
    }

    pub fn workflow_aware(mut self, v: bool) -> Self {
        self.config.workflow_aware = v;
        self
    }

    pub fn max_alternatives(mut self, n: usize) -> Self {
        self.config.max_alternatives = n;
        self
    }

    pub fn default_base_quality(mut self, q: u8) -> Self {
        self.config.default_base_quality = q.min(100);
        self
    }

    pub fn step_penalty(mut self, p: u8) -> Self {
        self.config.step_penalty = p.min(100);
        self
    }

    pub fn floor_quality(mut self, q: u8) -> Self {
        self.config.floor_quality = q.min(100);
        self
    }

    pub fn quality_warning_threshold(mut self, q: u8) -> Self {
        self.config.quality_warning_threshold = q.min(100);
        self
    }

    pub fn base_time_secs(mut self, secs: u32) -> Self {
        self.config.base_time_secs = secs;
        self
    }

    pub fn per_step_time_secs(mut self, secs: u32) -> Self {
        self.config.per_step_time_secs = secs;
        self
    }

    pub fn professional_base_time_secs(mut self, secs: u32) -> Self {
        self.config.professional_base_time_secs = secs;
        self
    }

    pub fn max_expansions(mut self, n: usize) -> Self {
        self.config.max_expansions = n.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PlannerConfig, RouteError> {
        validate(&self.config)?;
        Ok(self.config)
    }
}

/// Check cross-field constraints. Also applied to configs that bypass the
/// builder (deserialised or struct-literal) when a planner is constructed.
pub(crate) fn validate(c: &PlannerConfig) -> Result<(), RouteError> {
    if c.max_hops == 0 || c.max_hops > MAX_HOP_LIMIT {
        return Err(RouteError::InvalidConfig(format!(
            "max_hops must be 1–{MAX_HOP_LIMIT}, got {}",
            c.max_hops
        )));
    }
    if c.relaxed_max_hops < c.max_hops || c.relaxed_max_hops > MAX_HOP_LIMIT {
        return Err(RouteError::InvalidConfig(format!(
            "relaxed_max_hops must be {}–{MAX_HOP_LIMIT}, got {}",
            c.max_hops, c.relaxed_max_hops
        )));
    }
    if c.floor_quality > c.default_base_quality || c.default_base_quality > 100 {
        return Err(RouteError::InvalidConfig(format!(
            "quality bounds must satisfy floor ≤ default base ≤ 100, got {} / {}",
            c.floor_quality, c.default_base_quality
        )));
    }
    if c.quality_warning_threshold > 100 {
        return Err(RouteError::InvalidConfig(format!(
            "quality_warning_threshold must be ≤ 100, got {}",
            c.quality_warning_threshold
        )));
    }
    if c.max_expansions == 0 {
        return Err(RouteError::InvalidConfig(
            "max_expansions must be ≥ 1".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let g = PlannerConfig::general_purpose();
        assert!(!g.workflow_aware);
        assert_eq!(g.max_alternatives, 2);
        assert_eq!(g.max_hops, 4);

        let p = PlannerConfig::professional();
        assert!(p.workflow_aware);
        assert_eq!(p.max_alternatives, 3);
        assert_eq!(p.relaxed_max_hops, 5);

        assert_eq!(PlannerConfig::ebook().domain, Domain::Ebook);
    }

    #[test]
    fn hop_ceiling_relaxes_on_trigger() {
        let c = PlannerConfig::professional();
        assert_eq!(c.hop_ceiling(false), 4);
        assert_eq!(c.hop_ceiling(true), 5);
    }

    #[test]
    fn builder_clamps() {
        let c = PlannerConfig::builder()
            .max_hops(0)
            .relaxed_max_hops(99)
            .build()
            .unwrap();
        assert_eq!(c.max_hops, 1);
        assert_eq!(c.relaxed_max_hops, MAX_HOP_LIMIT);
    }

    #[test]
    fn relaxed_below_max_is_rejected() {
        let err = PlannerConfig::builder()
            .max_hops(5)
            .relaxed_max_hops(3)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("relaxed_max_hops"), "got: {err}");
    }

    #[test]
    fn floor_above_base_is_rejected() {
        let err = PlannerConfig::builder()
            .floor_quality(95)
            .build()
            .unwrap_err();
        assert!(matches!(err, RouteError::InvalidConfig(_)));
    }

    #[test]
    fn deserialise_partial_config_uses_defaults() {
        let c: PlannerConfig = serde_json::from_str(r#"{ "max_hops": 3 }"#).unwrap();
        assert_eq!(c.max_hops, 3);
        assert_eq!(c.step_penalty, 8);
        assert!(validate(&c).is_ok());
    }
}
