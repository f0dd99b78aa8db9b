//! CLI binary for formatroute.
//!
//! A thin shim over the library crate that maps CLI flags
//! to a `Planner` and prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use formatroute::{
    ConversionPath, ConversionResult, FormatCategory, FormatGraph, GraphSpec, Planner,
    PlannerConfig, PlannerConfigBuilder, WorkflowCatalog,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Direct conversion
  formatroute jpg pdf

  # Multi-step route
  formatroute txt png

  # Large master on the professional planner
  formatroute wav mp3 --size 60MB --planner professional

  # E-book formats
  formatroute epub mobi --planner ebook

  # Custom graph and workflow definitions, JSON output
  formatroute docx md --graph graph.json --workflows workflows.json --json

  # Formats known to a planner
  formatroute --list-formats --planner ebook

PLANNERS:
  general        Shortest routes between everyday formats (default)
  professional   Adds mastering/print workflows for large files, 3 alternatives
  ebook          E-book formats and the documents they are built from

SIZES:
  Raw bytes or a KB/MB/GB (KiB/MiB/GiB) suffix; multiples of 1024.

EXIT CODES:
  0  a route was found
  2  no route (domain rejection, disconnected formats, invalid input)
  1  fatal error (unreadable or invalid graph/workflow file, bad flags)

ENVIRONMENT VARIABLES:
  RUST_LOG                  Override the log filter (e.g. formatroute=debug)
  FORMATROUTE_SIZE          Default source file size (same units as --size)
  FORMATROUTE_PLANNER       Default planner preset
  FORMATROUTE_GRAPH         Default graph definition file
  FORMATROUTE_WORKFLOWS     Default workflow definition file
  FORMATROUTE_MAX_HOPS      Default hop ceiling (1-8)
  FORMATROUTE_JSON          Emit JSON output (true/false)
  FORMATROUTE_VERBOSE       Enable debug logging (true/false)
  FORMATROUTE_QUIET         Suppress output except errors and the result (true/false)
"#;

/// Plan file-format conversion routes.
#[derive(Parser, Debug)]
#[command(
    name = "formatroute",
    version,
    about = "Plan file-format conversion routes",
    long_about = "Find the best chain of direct conversions between two file formats, \
with quality and time estimates, alternatives, and professional workflows for large files.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source format extension (e.g. wav, .JPG).
    #[arg(required_unless_present = "list_formats")]
    source: Option<String>,

    /// Target format extension.
    #[arg(required_unless_present = "list_formats")]
    target: Option<String>,

    /// Source file size: bytes or KB/MB/GB (e.g. 60MB).
    #[arg(long, env = "FORMATROUTE_SIZE", value_parser = parse_size)]
    size: Option<u64>,

    /// Planner preset.
    #[arg(long, env = "FORMATROUTE_PLANNER", value_enum, default_value = "general")]
    planner: PlannerArg,

    /// JSON graph definition replacing the built-in catalog.
    #[arg(long, env = "FORMATROUTE_GRAPH")]
    graph: Option<PathBuf>,

    /// JSON array of workflow templates replacing the built-in ones.
    #[arg(long, env = "FORMATROUTE_WORKFLOWS")]
    workflows: Option<PathBuf>,

    /// Hop ceiling (1–8).
    #[arg(long, env = "FORMATROUTE_MAX_HOPS",
          value_parser = clap::value_parser!(u8).range(1..=8))]
    max_hops: Option<u8>,

    /// Output the ConversionResult as JSON.
    #[arg(long, env = "FORMATROUTE_JSON")]
    json: bool,

    /// List the formats available to the selected planner and exit.
    #[arg(long)]
    list_formats: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "FORMATROUTE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result.
    #[arg(short, long, env = "FORMATROUTE_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PlannerArg {
    General,
    Professional,
    Ebook,
}

impl From<PlannerArg> for PlannerConfig {
    fn from(v: PlannerArg) -> Self {
        match v {
            PlannerArg::General => PlannerConfig::general_purpose(),
            PlannerArg::Professional => PlannerConfig::professional(),
            PlannerArg::Ebook => PlannerConfig::ebook(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let planner = build_planner(&cli).await?;

    // ── List-formats mode ────────────────────────────────────────────────
    if cli.list_formats {
        print_formats(&planner);
        return Ok(ExitCode::SUCCESS);
    }

    // ── Plan ─────────────────────────────────────────────────────────────
    let source = cli.source.as_deref().unwrap_or_default();
    let target = cli.target.as_deref().unwrap_or_default();
    let result = planner.plan(source, target, cli.size);

    if cli.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialise result")?;
        println!("{json}");
    } else {
        print_result(&result, cli.quiet);
    }

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

/// Map CLI args to a `Planner`.
async fn build_planner(cli: &Cli) -> Result<Planner> {
    let preset: PlannerConfig = cli.planner.into();
    let relaxed = preset.relaxed_max_hops;
    let mut builder = PlannerConfigBuilder::from_config(preset);
    if let Some(n) = cli.max_hops {
        let n = usize::from(n);
        builder = builder.max_hops(n).relaxed_max_hops(n.max(relaxed));
    }
    let config = builder.build().context("Invalid planner configuration")?;

    let graph = match cli.graph {
        Some(ref path) => {
            let spec = GraphSpec::load_file(path)
                .await
                .with_context(|| format!("Failed to load graph from {}", path.display()))?;
            Arc::new(FormatGraph::from_spec(spec).context("Invalid graph definition")?)
        }
        None => FormatGraph::builtin().context("Built-in graph is invalid")?,
    };

    // Built-in templates reference built-in formats, so a custom graph
    // starts with no workflows unless a workflow file is given.
    let workflows = match (&cli.workflows, &cli.graph) {
        (Some(path), _) => WorkflowCatalog::load_file(path)
            .await
            .with_context(|| format!("Failed to load workflows from {}", path.display()))?,
        (None, Some(_)) => WorkflowCatalog::default(),
        (None, None) => WorkflowCatalog::builtin(),
    };

    debug!("Planner config: {:?}", config);
    Planner::new(graph, Arc::new(workflows), config).context("Failed to build planner")
}

/// Sizes like `1048576`, `60MB`, `1.5 GiB`; suffixes are multiples of 1024.
fn parse_size(s: &str) -> Result<u64, String> {
    static RE_SIZE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)^\s*(\d+(?:\.\d+)?)\s*(b|k|kb|kib|m|mb|mib|g|gb|gib)?\s*$").unwrap()
    });

    let caps = RE_SIZE
        .captures(s)
        .ok_or_else(|| format!("invalid size '{s}' (expected e.g. 60MB or 1048576)"))?;
    let value: f64 = caps[1]
        .parse()
        .map_err(|e| format!("invalid size '{s}': {e}"))?;
    let unit = caps.get(2).map(|m| m.as_str().to_ascii_lowercase());
    let multiplier: u64 = match unit.as_deref() {
        None | Some("b") => 1,
        Some(u) if u.starts_with('k') => 1 << 10,
        Some(u) if u.starts_with('m') => 1 << 20,
        Some(_) => 1 << 30,
    };

    let bytes = (value * multiplier as f64).round();
    if !bytes.is_finite() || bytes > u64::MAX as f64 {
        return Err(format!("size '{s}' is too large"));
    }
    Ok(bytes as u64)
}

fn format_route(path: &ConversionPath) -> String {
    path.path
        .iter()
        .map(|f| f.to_uppercase())
        .collect::<Vec<_>>()
        .join(" → ")
}

fn print_path(rank: usize, path: &ConversionPath) {
    let tag = match path.workflow {
        Some(ref w) => format!("  {}", cyan(&format!("[{w}]"))),
        None => String::new(),
    };
    println!(
        "  {}. {}  {}{}",
        rank,
        format_route(path),
        dim(&format!(
            "{} steps, quality {}, ~{}s",
            path.steps, path.estimated_quality, path.estimated_time_secs
        )),
        tag
    );
}

fn print_result(result: &ConversionResult, quiet: bool) {
    let Some(ref primary) = result.primary_path else {
        if let Some(ref err) = result.error {
            eprintln!("{} {}", red("✘"), err);
        }
        if let Some(ref rec) = result.recommendation {
            eprintln!("  {}", rec);
        }
        return;
    };

    println!("{} {}", green("✔"), bold(&format_route(primary)));
    if quiet {
        return;
    }

    println!("  {}", primary.description);
    println!(
        "  {}",
        dim(&format!(
            "{} steps · quality {} · ~{}s",
            primary.steps, primary.estimated_quality, primary.estimated_time_secs
        ))
    );
    if let Some(ref j) = primary.justification {
        println!("  {} {}", cyan("◆"), j);
    }
    for benefit in &primary.technical_benefits {
        println!("    - {benefit}");
    }
    if let Some(ref w) = primary.warning {
        println!("  {} {}", yellow("⚠"), w);
    }

    if !result.alternative_paths.is_empty() {
        println!();
        println!(
            "{}",
            bold(&format!(
                "Alternatives ({} of {} routes found):",
                result.alternative_paths.len(),
                result.total_routes_found.saturating_sub(1)
            ))
        );
        for (i, alt) in result.alternative_paths.iter().enumerate() {
            print_path(i + 2, alt);
        }
    }

    if let Some(ref rec) = result.recommendation {
        println!();
        println!("{}", rec);
    }
}

fn print_formats(planner: &Planner) {
    let domain = planner.config().domain;
    let mut groups: Vec<(FormatCategory, Vec<&str>)> = Vec::new();
    for node in planner.graph().formats_in(domain) {
        match groups.iter_mut().find(|(c, _)| *c == node.category) {
            Some((_, formats)) => formats.push(node.format.as_str()),
            None => groups.push((node.category, vec![node.format.as_str()])),
        }
    }

    println!("{}", bold(&format!("Formats in the {domain} domain:")));
    for (category, formats) in groups {
        println!("  {:<13} {}", format!("{category}:"), formats.join(", "));
    }
    if !planner.workflows().is_empty() && planner.config().workflow_aware {
        println!();
        println!("{}", bold("Workflows:"));
        for t in planner.workflows().templates() {
            println!(
                "  {:<18} {} → {}  {}",
                t.name,
                t.trigger.source,
                t.trigger.target,
                dim(&format!("≥ {} bytes", t.trigger.min_file_size_bytes))
            );
        }
    }
}
