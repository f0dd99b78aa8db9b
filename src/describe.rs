//! Human-readable text attached to planning results.
//!
//! Every description, advisory and recommendation string the planner emits is
//! built here, so wording changes touch one file and the tests below catch
//! regressions without running a search.

use crate::error::PlanError;
use crate::estimate::Advisory;
use crate::graph::{Domain, FormatGraph};
use crate::output::ConversionPath;
use crate::workflow::WorkflowTemplate;

/// Formats listed when suggesting alternatives for an unknown format.
const SUGGESTION_LIMIT: usize = 8;

/// Appended to warnings on non-workflow routes.
pub const DIRECT_ROUTE_HINT: &str = "A more direct route is recommended.";

fn upper(formats: &[String]) -> String {
    formats
        .iter()
        .map(|f| f.to_uppercase())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// One-line description of a route.
pub fn describe_path(
    graph: &FormatGraph,
    formats: &[String],
    workflow: Option<&WorkflowTemplate>,
) -> String {
    let steps = formats.len().saturating_sub(1);
    if let Some(t) = workflow {
        return format!(
            "Professional {} workflow: {} ({} steps)",
            t.name,
            upper(formats),
            steps
        );
    }
    match formats {
        [] => String::new(),
        [only] => format!("No conversion needed: file is already {}", only.to_uppercase()),
        [from, to] => match graph.edge_meta(from, to).and_then(|m| m.description.as_deref()) {
            Some(detail) => format!("Direct conversion {}: {detail}", upper(formats)),
            None => format!("Direct conversion {}", upper(formats)),
        },
        [_, middle @ .., _] => format!(
            "{} ({} steps via {})",
            upper(formats),
            steps,
            upper(middle)
        ),
    }
}

/// Short phrase for one advisory.
pub fn advisory_text(advisory: &Advisory) -> String {
    match advisory {
        Advisory::ExcessSteps { steps, recommended } => {
            format!("{steps} steps exceeds the recommended maximum of {recommended}")
        }
        Advisory::LowQuality { quality, threshold } => {
            format!("estimated quality {quality} is below {threshold}")
        }
        Advisory::UnjustifiedIntermediates { steps } => format!(
            "the {steps}-step route passes through intermediates with no clear technical benefit"
        ),
    }
}

/// Combined warning for a route, or `None` when there is nothing to flag.
///
/// `suggest_direct` appends [`DIRECT_ROUTE_HINT`]; workflow routes leave it off.
pub fn warning_text(advisories: &[Advisory], suggest_direct: bool) -> Option<String> {
    if advisories.is_empty() {
        return None;
    }
    let mut phrases: Vec<String> = advisories.iter().map(advisory_text).collect();
    if let Some(first) = phrases.first_mut() {
        capitalise(first);
    }
    let mut warning = format!("{}.", phrases.join("; "));
    if suggest_direct {
        warning.push(' ');
        warning.push_str(DIRECT_ROUTE_HINT);
    }
    Some(warning)
}

fn capitalise(s: &mut String) {
    if let Some(c) = s.chars().next() {
        let head = c.to_uppercase().to_string();
        s.replace_range(..c.len_utf8(), &head);
    }
}

/// Recommendation for a successful plan, based on its primary route.
pub fn success_recommendation(primary: &ConversionPath) -> String {
    if let (Some(name), Some(why)) = (&primary.workflow, &primary.justification) {
        return format!("Use the {name} workflow. {why}.");
    }
    match primary.steps {
        0 => "The file is already in the requested format.".to_string(),
        1 => "A direct conversion is available.".to_string(),
        steps => {
            let via = upper(primary.intermediates());
            let mut rec = format!("No direct conversion exists; convert via {via} ({steps} steps).");
            if primary.warning.is_some() {
                rec.push_str(" Review the route warning before proceeding.");
            }
            rec
        }
    }
}

/// Guidance for a failed plan.
pub fn failure_recommendation(
    graph: &FormatGraph,
    domain: Domain,
    error: &PlanError,
) -> Option<String> {
    let text = match error {
        PlanError::DomainRejected { format, .. } => match graph.node(format) {
            Some(node) => {
                let other = other_domain(domain);
                if node.in_domain(other) {
                    format!("'{format}' is handled by the {other} planner; use that planner instead.")
                } else {
                    format!("'{format}' cannot be routed by the {domain} planner.")
                }
            }
            None => {
                let known: Vec<&str> = graph
                    .formats_in(domain)
                    .into_iter()
                    .take(SUGGESTION_LIMIT)
                    .map(|n| n.format.as_str())
                    .collect();
                format!(
                    "'{format}' is not a recognised format. Supported {domain} formats include: {}.",
                    known.join(", ")
                )
            }
        },
        PlanError::NoRouteFound {
            source_format,
            target_format,
            max_hops,
        } => {
            let category = |f: &str| {
                graph
                    .node(f)
                    .map(|n| n.category.to_string())
                    .unwrap_or_else(|| "unknown".to_string())
            };
            format!(
                "No chain of conversions links {} ({}) to {} ({}) within {max_hops} steps. \
                 Choose a target in a compatible category.",
                source_format.to_uppercase(),
                category(source_format),
                target_format.to_uppercase(),
                category(target_format)
            )
        }
        PlanError::InvalidInput { .. } => {
            "Provide both formats as bare file extensions such as \"pdf\" or \"mp3\".".to_string()
        }
        PlanError::InternalComputation { .. } => {
            "Retry the request; if it keeps failing, lower the hop ceiling.".to_string()
        }
    };
    Some(text)
}

fn other_domain(domain: Domain) -> Domain {
    match domain {
        Domain::General => Domain::Ebook,
        Domain::Ebook => Domain::General,
    }
}
