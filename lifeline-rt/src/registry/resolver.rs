//! Deterministic dependency resolution.
//!
//! Startup order is a Kahn-style topological sort over the edges
//! `dependency -> dependent`, tie-broken by ascending registry index so the
//! order is stable across runs. Dependencies that are not registered are
//! ignored here (they are validated at start time). When the sort comes up
//! short a cycle exists; a DFS extracts one concrete cycle for reporting.

// Layer 1: Standard library imports
use std::collections::{BTreeSet, HashMap};

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use super::types::{MissingDependency, ValidationReport};

/// A dependency cycle, with the concrete path that closes it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Dependency cycle detected: {}", display_cycle(.cycle))]
pub struct CycleError {
    /// The nodes on the cycle, in dependency order (the last depends on the
    /// first).
    pub cycle: Vec<String>,
}

fn display_cycle(cycle: &[String]) -> String {
    let mut path = cycle.join(" -> ");
    if let Some(first) = cycle.first() {
        path.push_str(" -> ");
        path.push_str(first);
    }
    path
}

/// Computes the topological startup order for `nodes`.
///
/// `nodes` is the registry sequence: `(name, dependencies)` in registration
/// order. Ties are broken by ascending registry index. Unregistered
/// dependencies do not constrain the order.
///
/// # Errors
///
/// Returns [`CycleError`] with one concrete cycle when the dependency graph
/// is cyclic.
///
/// # Examples
///
/// ```rust
/// use lifeline_rt::registry::startup_order;
///
/// let nodes = vec![
///     ("api".to_string(), vec!["db".to_string()]),
///     ("db".to_string(), vec![]),
/// ];
/// let order = startup_order(&nodes).unwrap();
/// assert_eq!(order, vec!["db".to_string(), "api".to_string()]);
/// ```
pub fn startup_order(nodes: &[(String, Vec<String>)]) -> Result<Vec<String>, CycleError> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, (name, _))| (name.as_str(), i))
        .collect();

    // dependents[d] = registry indices of nodes depending on node d
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut in_degree: Vec<usize> = vec![0; nodes.len()];

    for (i, (_, deps)) in nodes.iter().enumerate() {
        for dep in deps {
            if let Some(&d) = index.get(dep.as_str()) {
                dependents[d].push(i);
                in_degree[i] += 1;
            }
        }
    }

    let mut ready: BTreeSet<usize> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, deg)| **deg == 0)
        .map(|(i, _)| i)
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(&i) = ready.iter().next() {
        ready.remove(&i);
        order.push(nodes[i].0.clone());
        for &dependent in &dependents[i] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if order.len() < nodes.len() {
        let leftover: Vec<(String, Vec<String>)> = nodes
            .iter()
            .enumerate()
            .filter(|(i, _)| in_degree[*i] > 0)
            .map(|(_, n)| n.clone())
            .collect();
        let cycle = find_cycle(&leftover).unwrap_or_else(|| {
            // A short order without an extractable cycle cannot happen; fall
            // back to naming the leftover nodes.
            leftover.iter().map(|(n, _)| n.clone()).collect()
        });
        return Err(CycleError { cycle });
    }

    Ok(order)
}

/// Finds one concrete dependency cycle in `nodes`, if any.
///
/// The returned path lists each node once, in dependency order; the last
/// node depends on the first.
pub fn find_cycle(nodes: &[(String, Vec<String>)]) -> Option<Vec<String>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, (name, _))| (name.as_str(), i))
        .collect();

    let mut colors = vec![Color::White; nodes.len()];
    let mut path: Vec<usize> = Vec::new();

    fn visit(
        i: usize,
        nodes: &[(String, Vec<String>)],
        index: &HashMap<&str, usize>,
        colors: &mut [Color],
        path: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        colors[i] = Color::Gray;
        path.push(i);
        for dep in &nodes[i].1 {
            if let Some(&d) = index.get(dep.as_str()) {
                match colors[d] {
                    Color::Gray => {
                        // Cycle closes at d: slice the path from d onward.
                        let start = path.iter().position(|&p| p == d).unwrap_or(0);
                        return Some(path[start..].to_vec());
                    }
                    Color::White => {
                        if let Some(cycle) = visit(d, nodes, index, colors, path) {
                            return Some(cycle);
                        }
                    }
                    Color::Black => {}
                }
            }
        }
        path.pop();
        colors[i] = Color::Black;
        None
    }

    for i in 0..nodes.len() {
        if colors[i] == Color::White {
            if let Some(cycle) = visit(i, nodes, &index, &mut colors, &mut path) {
                return Some(cycle.into_iter().map(|i| nodes[i].0.clone()).collect());
            }
        }
    }
    None
}

/// Reports every missing dependency and every cycle without failing.
///
/// `nodes` is the registry sequence: `(name, dependencies, optional)`.
/// Cycles are extracted repeatedly from the unresolvable remainder, so
/// disjoint cycles are all reported.
pub fn validate_dependencies(nodes: &[(String, Vec<String>, bool)]) -> ValidationReport {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, (name, _, _))| (name.as_str(), i))
        .collect();

    let mut missing = Vec::new();
    for (name, deps, optional) in nodes {
        for dep in deps {
            if !index.contains_key(dep.as_str()) {
                missing.push(MissingDependency {
                    component: name.clone(),
                    dependency: dep.clone(),
                    component_is_optional: *optional,
                });
            }
        }
    }

    let mut cycles = Vec::new();
    let mut remaining: Vec<(String, Vec<String>)> = nodes
        .iter()
        .map(|(n, d, _)| (n.clone(), d.clone()))
        .collect();
    while let Some(cycle) = find_cycle(&remaining) {
        remaining.retain(|(name, _)| !cycle.contains(name));
        cycles.push(cycle);
    }

    ValidationReport { missing, cycles }
}
