// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Graph file loading (YAML or JSON) and structural checks.

use super::GraphDefinition;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::Path;

/// Parses and validates a YAML graph definition.
///
/// # Errors
///
/// Returns an error if the document cannot be parsed or fails [`GraphDefinition::validate`].
pub fn load_yaml(source: &str) -> Result<GraphDefinition, String> {
    let graph: GraphDefinition =
        serde_saphyr::from_str(source).map_err(|e| format!("Invalid graph YAML: {e}"))?;
    graph.validate()?;
    Ok(graph)
}

/// Parses and validates a JSON graph definition.
///
/// # Errors
///
/// Returns an error if the document cannot be parsed or fails [`GraphDefinition::validate`].
pub fn load_json(source: &str) -> Result<GraphDefinition, String> {
    let graph: GraphDefinition =
        serde_json::from_str(source).map_err(|e| format!("Invalid graph JSON: {e}"))?;
    graph.validate()?;
    Ok(graph)
}

/// Reads a graph file, choosing the parser from the extension (`.json`, otherwise YAML).
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub fn load_path(path: &Path) -> Result<GraphDefinition, String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read graph file {}: {e}", path.display()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(&source),
        _ => load_yaml(&source),
    }
}

/// Detect cycles through visible links using DFS.
///
/// Wireless edges are not visible here; cycles closed by them are reported by the
/// scheduler when no pending node can be staged.
pub(crate) fn detect_cycles(graph: &GraphDefinition) -> Result<(), String> {
    fn dfs<'a>(
        node: &'a str,
        adjacency: &IndexMap<&'a str, Vec<&'a str>>,
        visited: &mut HashSet<&'a str>,
        rec_stack: &mut HashSet<&'a str>,
        cycle_path: &mut Vec<&'a str>,
    ) -> Option<String> {
        visited.insert(node);
        rec_stack.insert(node);
        cycle_path.push(node);

        if let Some(neighbors) = adjacency.get(node) {
            for &neighbor in neighbors {
                if !visited.contains(neighbor) {
                    if let Some(cycle) = dfs(neighbor, adjacency, visited, rec_stack, cycle_path) {
                        return Some(cycle);
                    }
                } else if rec_stack.contains(neighbor) {
                    let start = cycle_path.iter().position(|&n| n == neighbor).unwrap_or(0);
                    return Some(format!(
                        "Circular dependency detected: {} -> {neighbor}",
                        cycle_path[start..].join(" -> ")
                    ));
                }
            }
        }

        rec_stack.remove(node);
        cycle_path.pop();
        None
    }

    // Edge: producer -> consumer (data flows along links)
    let mut adjacency: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for (id, spec) in &graph.nodes {
        adjacency.entry(id.as_str()).or_default();
        for (_, link) in spec.links() {
            if let Some((key, _)) = graph.nodes.get_key_value(&link.node) {
                adjacency.entry(key.as_str()).or_default().push(id.as_str());
            }
        }
    }

    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut cycle_path = Vec::new();

    for id in graph.nodes.keys() {
        if !visited.contains(id.as_str()) {
            if let Some(cycle) =
                dfs(id, &adjacency, &mut visited, &mut rec_stack, &mut cycle_path)
            {
                return Err(cycle);
            }
        }
    }

    Ok(())
}
