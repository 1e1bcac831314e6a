use std::collections::{HashMap, HashSet};

use crate::graph::ModuleGraph;

/// Find every distinct import cycle in the graph.
///
/// Depth-first search with a global visited set and a current-path
/// stack: reaching a node already on the stack closes a cycle over the
/// stack slice from its first occurrence. Each cycle is canonicalized
/// to its lexicographically-minimal rotation before dedupe, so the
/// same cycle is reported exactly once no matter which node the search
/// entered it from.
pub fn find_cycles(graph: &ModuleGraph) -> Vec<Vec<String>> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut seen_keys: HashSet<String> = HashSet::new();
    let mut cycles = Vec::new();

    for start in graph.paths() {
        if visited.contains(start) {
            continue;
        }
        visited.insert(start);

        // Iterative DFS; frames carry the next child offset so the
        // stack doubles as the current path.
        let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
        let mut on_path: HashMap<&str, usize> = HashMap::new();
        on_path.insert(start, 0);

        loop {
            let Some(&(node, child_idx)) = stack.last() else {
                break;
            };
            let children = graph.imports_of(node);

            if child_idx >= children.len() {
                on_path.remove(node);
                stack.pop();
                continue;
            }
            if let Some(frame) = stack.last_mut() {
                frame.1 += 1;
            }

            let child = children[child_idx].as_str();
            if let Some(&pos) = on_path.get(child) {
                let cycle: Vec<String> =
                    stack[pos..].iter().map(|(p, _)| p.to_string()).collect();
                let canonical = canonical_rotation(cycle);
                if seen_keys.insert(canonical.join("\n")) {
                    cycles.push(canonical);
                }
            } else if !visited.contains(child) {
                visited.insert(child);
                on_path.insert(child, stack.len());
                stack.push((child, 0));
            }
        }
    }

    cycles
}

/// Rotate a cycle so its lexicographically smallest path comes first.
/// Paths within a cycle are unique (the current-path stack holds each
/// node at most once), so the minimum is unambiguous.
fn canonical_rotation(cycle: Vec<String>) -> Vec<String> {
    let Some(min_pos) = cycle
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(i, _)| i)
    else {
        return cycle;
    };
    let mut rotated = cycle;
    rotated.rotate_left(min_pos);
    rotated
}
