//! # formatroute
//!
//! Plan file-format conversions as routes through a graph of direct
//! conversions.
//!
//! ## Why this crate?
//!
//! Most conversion tools answer "can A become B?" with a single lookup and
//! give up when no direct converter exists. Real pipelines chain converters
//! (TXT → PDF → PNG), and for large masters the shortest chain is not always
//! the best one: a 60 MB WAV headed for MP3 deserves a lossless archival stage
//! first. This crate searches the format graph, estimates the fidelity and
//! processing cost of every viable route, and explains its choice.
//!
//! ## Planning Overview
//!
//! ```text
//! (source, target, size)
//!  │
//!  ├─ 1. Normalise   case, leading '.', aliases (jpeg → jpg)
//!  ├─ 2. Domain      general or e-book format set
//!  ├─ 3. Workflows   professional templates (audio/video mastering, print)
//!  ├─ 4. Search      bounded breadth-first enumeration of cycle-free routes
//!  ├─ 5. Estimate    quality 60–100, seconds, advisories, justification
//!  └─ 6. Result      primary route + alternatives + recommendation
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use formatroute::Planner;
//!
//! let planner = Planner::professional().unwrap();
//! let result = planner.plan("wav", "mp3", Some(60 * 1024 * 1024));
//!
//! let primary = result.primary_path.unwrap();
//! assert_eq!(primary.workflow.as_deref(), Some("audio_mastering"));
//! assert_eq!(primary.estimated_quality, 79);
//! ```
//!
//! Failures never panic or propagate: they arrive in
//! [`ConversionResult::error`] with a recommendation.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `formatroute` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! formatroute = { version = "0.1", default-features = false }
//! ```
//!
//! ## Planner Presets
//!
//! | Preset | Domain | Workflows | Alternatives |
//! |--------|--------|-----------|--------------|
//! | [`Planner::general_purpose`] | general | off | 2 |
//! | [`Planner::professional`]    | general | on  | 3 |
//! | [`Planner::ebook`]           | e-book  | off | 2 |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod describe;
pub mod error;
pub mod estimate;
pub mod graph;
pub mod output;
pub mod plan;
pub mod search;
pub mod workflow;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PlannerConfig, PlannerConfigBuilder, MAX_HOP_LIMIT};
pub use error::{PlanError, RouteError};
pub use graph::{Domain, EdgeMeta, EdgeSpec, FormatCategory, FormatGraph, FormatNode, GraphSpec};
pub use output::{ConversionPath, ConversionResult};
pub use plan::{normalise_format, Planner};
pub use workflow::{Trigger, WorkflowCatalog, WorkflowTemplate};
