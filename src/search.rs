//! Bounded breadth-first path finder.
//!
//! Enumerates every cycle-free route from source to target whose step count
//! is within the hop ceiling and whose formats all belong to the requested
//! domain.
//!
//! The queue holds `(current, path-so-far)` pairs. A first-discovered-length
//! table records the shortest path length at which each format was reached;
//! a format dequeued on a strictly longer path is not expanded again. Paths of
//! equal length still expand, so every shortest way through a format is
//! collected, and completed paths into the target are always recorded.
//!
//! Cycle avoidance is a linear membership check on the path, which is fine
//! with hop ceilings of at most [`crate::config::MAX_HOP_LIMIT`].

use crate::graph::{Domain, FormatGraph};
use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Parameters for one search.
#[derive(Debug, Clone, Copy)]
pub struct SearchParams<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub domain: Domain,
    pub max_hops: usize,
    /// Queue pops allowed before the search gives up.
    pub max_expansions: usize,
}

/// A completed route as found by the search, before estimation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FoundPath {
    pub formats: Vec<String>,
}

impl FoundPath {
    pub fn steps(&self) -> usize {
        self.formats.len().saturating_sub(1)
    }
}

/// Search aborted before the queue drained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetExhausted {
    pub expansions: usize,
}

/// Enumerate all viable routes, in breadth-first discovery order.
///
/// Returns an empty list when source or target is outside the domain (the
/// caller classifies that as a domain rejection) or when no route exists
/// within the ceiling. `source == target` yields the single zero-step path.
pub fn find_paths(
    graph: &FormatGraph,
    params: &SearchParams<'_>,
) -> Result<Vec<FoundPath>, BudgetExhausted> {
    let (Some(source), Some(target)) = (graph.index_of(params.source), graph.index_of(params.target))
    else {
        return Ok(Vec::new());
    };
    let allowed = |idx: usize| graph.node_at(idx).in_domain(params.domain);
    if !allowed(source) || !allowed(target) {
        return Ok(Vec::new());
    }
    if source == target {
        return Ok(vec![to_found(graph, &[source])]);
    }

    let mut first_len: Vec<Option<usize>> = vec![None; graph.len()];
    first_len[source] = Some(1);

    let mut queue: VecDeque<(usize, Vec<usize>)> = VecDeque::new();
    queue.push_back((source, vec![source]));

    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let mut completed: Vec<FoundPath> = Vec::new();
    let mut expansions = 0usize;

    while let Some((current, path)) = queue.pop_front() {
        expansions += 1;
        if expansions > params.max_expansions {
            return Err(BudgetExhausted { expansions });
        }

        if current == target {
            if seen.insert(path.clone()) {
                completed.push(to_found(graph, &path));
            }
            continue;
        }

        let steps = path.len() - 1;
        if steps >= params.max_hops {
            continue;
        }
        if first_len[current].is_some_and(|shortest| shortest < path.len()) {
            continue;
        }

        for &next in graph.neighbor_ids(current) {
            if !allowed(next) || path.contains(&next) {
                continue;
            }
            let next_len = path.len() + 1;
            if first_len[next].is_none() {
                first_len[next] = Some(next_len);
            }
            let mut extended = path.clone();
            extended.push(next);
            queue.push_back((next, extended));
        }
    }

    debug!(
        "Search {} → {} (≤{} hops, {} domain): {} routes, {} expansions",
        params.source,
        params.target,
        params.max_hops,
        params.domain,
        completed.len(),
        expansions
    );
    Ok(completed)
}

/// Stable sort: ascending step count, then descending quality.
pub fn sort_by_steps_then_quality<T>(
    items: &mut [T],
    steps: impl Fn(&T) -> usize,
    quality: impl Fn(&T) -> u8,
) {
    items.sort_by(|a, b| match steps(a).cmp(&steps(b)) {
        Ordering::Equal => quality(b).cmp(&quality(a)),
        other => other,
    });
}

fn to_found(graph: &FormatGraph, path: &[usize]) -> FoundPath {
    FoundPath {
        formats: path
            .iter()
            .map(|&i| graph.node_at(i).format.clone())
            .collect(),
    }
}
