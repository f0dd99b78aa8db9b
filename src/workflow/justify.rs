//! Technical justification for long routes that match no template.
//!
//! A route of three or more steps is justified when both hold:
//!
//! 1. some intermediate is a hub format reached by a lossless hop, and
//! 2. the final hop starts from an intermediate in the target's category,
//!    so the last conversion only adapts delivery characteristics.
//!
//! Unjustified routes keep their place in the ranking but carry an advisory
//! recommending a more direct route.

use crate::graph::FormatGraph;

/// Outcome of evaluating one route.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Justification {
    pub justified: bool,
    /// Every criterion the route satisfied, in route order.
    pub reasons: Vec<String>,
}

impl Justification {
    /// Reasons joined for display, if any.
    pub fn summary(&self) -> Option<String> {
        if self.reasons.is_empty() {
            None
        } else {
            Some(self.reasons.join("; "))
        }
    }
}

/// Evaluate `formats` (source and target inclusive) against `graph`.
pub fn evaluate(graph: &FormatGraph, formats: &[String]) -> Justification {
    let n = formats.len();
    if n < 3 {
        return Justification::default();
    }

    let mut reasons = Vec::new();

    let mut lossless_hub = false;
    for hop in formats[..n - 1].windows(2) {
        let (prev, cur) = (&hop[0], &hop[1]);
        let is_hub = graph.node(cur).is_some_and(|node| node.hub);
        let lossless = graph.edge_meta(prev, cur).is_some_and(|m| m.lossless);
        if is_hub && lossless {
            lossless_hub = true;
            reasons.push(format!(
                "{} is a lossless hub reached without quality loss",
                cur.to_uppercase()
            ));
        }
    }

    let last_from = &formats[n - 2];
    let target = &formats[n - 1];
    let delivery = match (graph.node(last_from), graph.node(target)) {
        (Some(from), Some(to)) if from.category == to.category => {
            reasons.push(format!(
                "final hop {} → {} stays within {}, adapting only delivery characteristics",
                last_from.to_uppercase(),
                target.to_uppercase(),
                to.category
            ));
            true
        }
        _ => false,
    };

    Justification {
        justified: lossless_hub && delivery,
        reasons,
    }
}
