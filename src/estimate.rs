//! Quality and time estimation for conversion routes.
//!
//! ```text
//! base      = quality of the final hop's edge, or the planner default
//! quality   = max(floor, base − penalty × (steps − 1))
//! time      = base_time + (steps − 1) × per_step_time
//! ```
//!
//! Zero-step routes (source == target) are always quality 100, time 0.
//! Professional workflows substitute their template's base quality, penalty,
//! floor and per-step time, and a larger fixed overhead.

use crate::config::PlannerConfig;
use crate::graph::FormatGraph;
use serde::{Deserialize, Serialize};

/// Quality of a zero-step route.
pub const TRIVIAL_QUALITY: u8 = 100;

/// Base quality for professional workflows that do not declare one.
pub const DEFAULT_PROFESSIONAL_BASE_QUALITY: u8 = 95;

/// Degradation constants for one class of route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityModel {
    pub base: u8,
    pub step_penalty: u8,
    pub floor: u8,
}

impl QualityModel {
    /// Standard model for a route whose final hop is `last_from → last_to`.
    pub fn for_final_hop(
        graph: &FormatGraph,
        config: &PlannerConfig,
        last_from: &str,
        last_to: &str,
    ) -> Self {
        Self {
            base: base_quality(graph, last_from, last_to, config.default_base_quality),
            step_penalty: config.step_penalty,
            floor: config.floor_quality,
        }
    }

    pub fn estimate(&self, steps: usize) -> u8 {
        degraded_quality(self.base, steps, self.step_penalty, self.floor)
    }
}

/// Processing-time constants for one class of route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeModel {
    pub base_secs: u32,
    pub per_step_secs: u32,
}

impl TimeModel {
    pub fn standard(config: &PlannerConfig) -> Self {
        Self {
            base_secs: config.base_time_secs,
            per_step_secs: config.per_step_time_secs,
        }
    }

    pub fn professional(config: &PlannerConfig, per_step_secs: u32) -> Self {
        Self {
            base_secs: config.professional_base_time_secs,
            per_step_secs,
        }
    }

    pub fn estimate(&self, steps: usize) -> u32 {
        estimated_time(steps, self.base_secs, self.per_step_secs)
    }
}

/// Base fidelity of the hop `from → to`, falling back to `default`.
pub fn base_quality(graph: &FormatGraph, from: &str, to: &str, default: u8) -> u8 {
    graph
        .edge_meta(from, to)
        .and_then(|m| m.quality)
        .unwrap_or(default)
}

/// `max(floor, base − penalty × (steps − 1))`; 100 for zero steps.
pub fn degraded_quality(base: u8, steps: usize, penalty: u8, floor: u8) -> u8 {
    if steps == 0 {
        return TRIVIAL_QUALITY;
    }
    let extra = u32::try_from(steps - 1).unwrap_or(u32::MAX);
    let loss = extra.saturating_mul(u32::from(penalty));
    let degraded = u32::from(base).saturating_sub(loss);
    // `degraded` ≤ base ≤ 255, so the conversion cannot fail.
    u8::try_from(degraded).unwrap_or(0).max(floor)
}

/// `base + (steps − 1) × per_step`; 0 for zero steps.
pub fn estimated_time(steps: usize, base_secs: u32, per_step_secs: u32) -> u32 {
    if steps == 0 {
        return 0;
    }
    let extra = u32::try_from(steps - 1).unwrap_or(u32::MAX);
    base_secs.saturating_add(extra.saturating_mul(per_step_secs))
}

/// Non-fatal findings attached to an otherwise successful route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// More steps than the recommended ceiling.
    ExcessSteps { steps: usize, recommended: usize },
    /// Estimated quality below the warning threshold.
    LowQuality { quality: u8, threshold: u8 },
    /// A ≥3-step route whose intermediates showed no technical merit.
    UnjustifiedIntermediates { steps: usize },
}

/// Step-count and quality advisories for a route.
pub fn advisories(config: &PlannerConfig, steps: usize, quality: u8) -> Vec<Advisory> {
    let mut out = Vec::new();
    if steps > config.recommended_max_steps {
        out.push(Advisory::ExcessSteps {
            steps,
            recommended: config.recommended_max_steps,
        });
    }
    if quality < config.quality_warning_threshold {
        out.push(Advisory::LowQuality {
            quality,
            threshold: config.quality_warning_threshold,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_keeps_base() {
        assert_eq!(degraded_quality(95, 1, 8, 60), 95);
    }

    #[test]
    fn professional_three_step_example() {
        assert_eq!(degraded_quality(95, 3, 8, 60), 79);
    }

    #[test]
    fn floor_is_respected() {
        assert_eq!(degraded_quality(90, 10, 8, 60), 60);
        assert_eq!(degraded_quality(90, usize::MAX, 8, 60), 60);
    }

    #[test]
    fn zero_steps_is_perfect() {
        assert_eq!(degraded_quality(50, 0, 8, 60), TRIVIAL_QUALITY);
        assert_eq!(estimated_time(0, 5, 3), 0);
    }

    #[test]
    fn quality_is_non_increasing_in_steps() {
        for base in [60u8, 75, 90, 100] {
            let mut prev = degraded_quality(base, 1, 8, 60);
            for steps in 2..=8 {
                let q = degraded_quality(base, steps, 8, 60);
                assert!(q <= prev, "base {base}: step {steps} rose {prev} → {q}");
                prev = q;
            }
        }
    }

    #[test]
    fn time_grows_per_step() {
        assert_eq!(estimated_time(1, 5, 3), 5);
        assert_eq!(estimated_time(3, 5, 3), 11);
        assert_eq!(estimated_time(3, 12, 8), 28);
    }

    #[test]
    fn base_quality_falls_back_to_default() {
        let g = FormatGraph::builtin().unwrap();
        assert_eq!(base_quality(&g, "jpg", "pdf", 90), 95);
        assert_eq!(base_quality(&g, "jpg", "gif", 90), 90);
    }

    #[test]
    fn advisories_for_long_low_quality_route() {
        let c = PlannerConfig::default();
        assert!(advisories(&c, 2, 85).is_empty());
        let a = advisories(&c, 4, 66);
        assert_eq!(
            a,
            vec![
                Advisory::ExcessSteps {
                    steps: 4,
                    recommended: 3
                },
                Advisory::LowQuality {
                    quality: 66,
                    threshold: 80
                },
            ]
        );
    }
}
