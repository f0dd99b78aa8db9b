//! Integration tests for formatroute.
//!
//! These exercise the public API end to end: built-in planners, JSON graph
//! and workflow definitions loaded from disk, and the serialised result shape.
//!
//! Run with:
//!   cargo test --test planner -- --nocapture

use formatroute::{
    ConversionResult, Domain, FormatGraph, GraphSpec, PlanError, Planner, PlannerConfig,
    RouteError, WorkflowCatalog,
};
use std::io::Write;
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

const MB: u64 = 1024 * 1024;

fn route(result: &ConversionResult) -> Vec<&str> {
    result
        .primary_path
        .as_ref()
        .map(|p| p.path.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Assert the structural invariants every result must satisfy.
fn assert_result_shape(r: &ConversionResult, cap: usize, context: &str) {
    assert_eq!(
        r.success,
        r.primary_path.is_some(),
        "[{context}] success must match primary presence"
    );
    assert_eq!(
        r.success,
        r.error.is_none(),
        "[{context}] error must be set exactly on failure"
    );
    assert!(
        r.alternative_paths.len() <= cap,
        "[{context}] {} alternatives exceeds cap {cap}",
        r.alternative_paths.len()
    );
    for p in r.all_paths() {
        assert_eq!(p.steps + 1, p.path.len(), "[{context}] step count");
        assert!(
            (60..=100).contains(&p.estimated_quality),
            "[{context}] quality {} out of range",
            p.estimated_quality
        );
        let mut seen = std::collections::HashSet::new();
        assert!(
            p.path.iter().all(|f| seen.insert(f)),
            "[{context}] route {:?} repeats a format",
            p.path
        );
    }
}

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f
}

const SMALL_GRAPH: &str = r#"{
    "nodes": [
        { "format": "a", "category": "document", "domains": ["general"], "hub": true },
        { "format": "b", "category": "document", "domains": ["general"] },
        { "format": "c", "category": "image",    "domains": ["general"] },
        { "format": "z", "category": "archive",  "domains": ["general"] }
    ],
    "edges": [
        { "from": "a", "to": "b", "lossless": true, "quality": 99 },
        { "from": "b", "to": "c", "quality": 70, "description": "Rasterise" },
        { "from": "a", "to": "c" }
    ],
    "aliases": { "alpha": "a" }
}"#;

// ── Built-in planners ────────────────────────────────────────────────────────

#[test]
fn test_builtin_properties() {
    let general = Planner::general_purpose().unwrap();

    let r = general.plan("jpg", "pdf", None);
    assert_result_shape(&r, 2, "jpg→pdf");
    assert_eq!(route(&r), vec!["jpg", "pdf"]);
    let p = r.primary_path.as_ref().unwrap();
    assert!(p.is_optimal);
    assert_eq!(p.estimated_quality, 95);

    let r = general.plan("txt", "png", None);
    assert_result_shape(&r, 2, "txt→png");
    assert_eq!(route(&r), vec!["txt", "pdf", "png"]);
    let q = r.primary_path.as_ref().unwrap().estimated_quality;
    assert!(q < 90 && q >= 60, "quality {q}");

    let r = general.plan("mp4", "mp4", None);
    assert_eq!(r.primary_path.as_ref().unwrap().estimated_quality, 100);
}

#[test]
fn test_professional_audio_mastering() {
    let planner = Planner::professional().unwrap();
    let r = planner.plan("WAV", ".mp3", Some(60 * MB));
    assert_result_shape(&r, 3, "wav→mp3 60MB");

    let p = r.primary_path.as_ref().unwrap();
    assert_eq!(p.workflow.as_deref(), Some("audio_mastering"));
    assert!(p.is_professional);
    assert_eq!(p.steps, 3);
    assert_eq!(p.estimated_quality, 79);
    // The direct encode is still offered.
    assert!(r
        .alternative_paths
        .iter()
        .any(|a| a.path == vec!["wav", "mp3"]));
}

#[test]
fn test_failures_carry_recommendations() {
    let general = Planner::general_purpose().unwrap();

    let r = general.plan("epub", "pdf", None);
    assert_result_shape(&r, 2, "epub general");
    assert!(matches!(
        r.error,
        Some(PlanError::DomainRejected {
            domain: Domain::General,
            ..
        })
    ));
    assert!(r.recommendation.is_some());

    let r = general.plan("zip", "mp3", None);
    assert_result_shape(&r, 2, "zip→mp3");
    assert!(matches!(r.error, Some(PlanError::NoRouteFound { .. })));
    assert!(r.alternative_paths.is_empty());

    let r = general.plan("", "mp3", None);
    assert!(matches!(r.error, Some(PlanError::InvalidInput { .. })));
}

#[test]
fn test_alternatives_ordered_by_steps() {
    let planner = Planner::with_config(
        PlannerConfig::builder()
            .max_alternatives(50)
            .build()
            .unwrap(),
    )
    .unwrap();
    for (s, t) in [("txt", "png"), ("wav", "m4a"), ("mkv", "gif"), ("rtf", "md")] {
        let r = planner.plan(s, t, None);
        assert_result_shape(&r, 50, &format!("{s}→{t}"));
        let steps: Vec<usize> = r.all_paths().map(|p| p.steps).collect();
        assert!(
            steps.windows(2).all(|w| w[0] <= w[1]),
            "{s}→{t}: steps not ascending {steps:?}"
        );
    }
}

#[test]
fn test_result_serialises_to_json() {
    let planner = Planner::professional().unwrap();
    let r = planner.plan("heic", "pdf", Some(25 * MB));
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["primary_path"]["workflow"], "print_preparation");
    assert_eq!(json["primary_path"]["is_professional"], true);

    let back: ConversionResult = serde_json::from_value(json).unwrap();
    assert_eq!(back, r);
}

#[test]
fn test_planner_shared_across_threads() {
    let planner = Arc::new(Planner::professional().unwrap());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let planner = Arc::clone(&planner);
            std::thread::spawn(move || planner.plan("wav", "mp3", Some(60 * MB)))
        })
        .collect();
    let results: Vec<ConversionResult> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}

// ── Definitions loaded from disk ─────────────────────────────────────────────

#[tokio::test]
async fn test_custom_graph_from_file() {
    let file = write_temp(SMALL_GRAPH);
    let spec = GraphSpec::load_file(file.path()).await.unwrap();
    let graph = Arc::new(FormatGraph::from_spec(spec).unwrap());
    assert_eq!(graph.len(), 4);
    assert_eq!(graph.edge_count(), 3);

    let planner = Planner::new(
        graph,
        Arc::new(WorkflowCatalog::default()),
        PlannerConfig::general_purpose(),
    )
    .unwrap();

    let r = planner.plan("alpha", "c", None);
    assert_result_shape(&r, 2, "custom a→c");
    assert_eq!(route(&r), vec!["a", "c"]);
    assert_eq!(r.primary_path.as_ref().unwrap().estimated_quality, 90);
    assert_eq!(r.alternative_paths[0].path, vec!["a", "b", "c"]);
    assert_eq!(r.alternative_paths[0].estimated_quality, 62);

    let r = planner.plan("a", "z", None);
    assert!(matches!(r.error, Some(PlanError::NoRouteFound { .. })));
}

#[tokio::test]
async fn test_custom_workflow_from_file() {
    let graph = Arc::new(FormatGraph::from_spec(GraphSpec::from_json_str(SMALL_GRAPH).unwrap()).unwrap());
    let file = write_temp(
        r#"[{
            "name": "via_b",
            "trigger": { "source": "a", "target": "c", "min_file_size_bytes": 1000 },
            "route": ["a", "b", "c"],
            "step_time_secs": 4,
            "justification": "Stage through b",
            "technical_benefits": ["b keeps the source editable"]
        }]"#,
    );
    let workflows = WorkflowCatalog::load_file(file.path()).await.unwrap();
    let planner = Planner::new(
        graph,
        Arc::new(workflows),
        PlannerConfig::professional(),
    )
    .unwrap();

    let r = planner.plan("a", "c", Some(5000));
    let p = r.primary_path.as_ref().unwrap();
    assert_eq!(p.workflow.as_deref(), Some("via_b"));
    assert_eq!(p.estimated_quality, 87);
    assert_eq!(p.estimated_time_secs, 12 + 4);

    let r = planner.plan("a", "c", Some(10));
    assert_eq!(route(&r), vec!["a", "c"]);
}

#[test]
fn test_invalid_definitions_are_fatal() {
    let err = tokio_test::block_on(GraphSpec::load_file("/nonexistent/graph.json")).unwrap_err();
    assert!(matches!(err, RouteError::ReadFailed { .. }));

    let file = write_temp("{ not json");
    let err = tokio_test::block_on(GraphSpec::load_file(file.path())).unwrap_err();
    assert!(matches!(err, RouteError::ParseFailed { .. }));

    let broken = SMALL_GRAPH.replace(r#""to": "c" }"#, r#""to": "q" }"#);
    let err = FormatGraph::from_spec(GraphSpec::from_json_str(&broken).unwrap()).unwrap_err();
    assert!(matches!(err, RouteError::UnknownFormat { .. }), "got: {err}");

    // Built-in templates do not fit a graph without their formats.
    let graph = Arc::new(FormatGraph::from_spec(GraphSpec::from_json_str(SMALL_GRAPH).unwrap()).unwrap());
    let err = Planner::new(
        graph,
        Arc::new(WorkflowCatalog::builtin()),
        PlannerConfig::professional(),
    )
    .unwrap_err();
    assert!(matches!(err, RouteError::UnknownFormat { .. }), "got: {err}");
}

#[test]
fn test_undiscoverable_workflow_is_fatal() {
    // flac is one hop from wav, so the search never extends wav → aiff → flac.
    let workflows = WorkflowCatalog::from_json_str(
        r#"[{
            "name": "aiff_staging",
            "trigger": { "source": "wav", "target": "mp3", "min_file_size_bytes": 1000 },
            "route": ["wav", "aiff", "flac", "mp3"],
            "step_time_secs": 8,
            "justification": "Stage through AIFF before the lossless archive"
        }]"#,
    )
    .unwrap();
    let err = Planner::new(
        FormatGraph::builtin().unwrap(),
        Arc::new(workflows),
        PlannerConfig::professional(),
    )
    .unwrap_err();
    assert!(
        matches!(&err, RouteError::InvalidWorkflow { name, .. } if name == "aiff_staging"),
        "got: {err}"
    );

    // Built-in templates route through general-domain formats only.
    let config = PlannerConfig::builder()
        .domain(Domain::Ebook)
        .workflow_aware(true)
        .build()
        .unwrap();
    let err = Planner::with_config(config).unwrap_err();
    assert!(matches!(err, RouteError::InvalidWorkflow { .. }), "got: {err}");

    assert!(Planner::ebook().is_ok());
}
