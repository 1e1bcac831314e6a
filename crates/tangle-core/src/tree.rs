use std::collections::HashSet;

use crate::extract::ComponentClassifier;
use crate::graph::ModuleGraph;
use crate::index::FileIndex;
use crate::types::ComponentNode;

/// Builds the recursive component usage tree for visualization.
///
/// The tree is a derived view of the graph restricted to files the
/// injected classifier marks as UI components. By default shared
/// subtrees are duplicated per importing branch (diamonds appear twice,
/// cycles terminate via the per-branch visited set); `dag_compress`
/// switches to single-instance rendering where an already-expanded
/// component is re-emitted as a child-less leaf.
pub struct ComponentTreeBuilder<'a> {
    graph: &'a ModuleGraph,
    index: &'a FileIndex,
    components: HashSet<String>,
    dag_compress: bool,
}

impl<'a> ComponentTreeBuilder<'a> {
    pub fn new(
        graph: &'a ModuleGraph,
        index: &'a FileIndex,
        classifier: &dyn ComponentClassifier,
        dag_compress: bool,
    ) -> Self {
        let components = index
            .iter()
            .filter(|(path, content)| classifier.is_component(path, content))
            .map(|(path, _)| path.to_string())
            .collect();
        Self {
            graph,
            index,
            components,
            dag_compress,
        }
    }

    /// Build one tree per top-level component: a component file not
    /// imported by any other component and with at least one outgoing
    /// edge.
    pub fn build_forest(&self) -> Vec<ComponentNode> {
        let mut forest = Vec::new();
        let mut expanded = HashSet::new();

        for path in self.graph.paths() {
            if !self.components.contains(path) || self.graph.fan_out(path) == 0 {
                continue;
            }
            let has_component_importer = self
                .graph
                .imported_by_of(path)
                .iter()
                .any(|p| p != path && self.components.contains(p));
            if has_component_importer {
                continue;
            }

            let node = if self.dag_compress {
                self.build_compressed(path, &mut expanded)
            } else {
                self.build_tree(path, &HashSet::new())
            };
            if let Some(node) = node {
                forest.push(node);
            }
        }
        forest
    }

    /// Expand one component. Each recursive call receives a copy of
    /// `visited` with the current path added; a path already in the
    /// incoming set prunes to `None`. The copy is per branch, so a
    /// diamond dependency legitimately appears under both importers
    /// while any cycle along a single branch terminates.
    pub fn build_tree(&self, path: &str, visited: &HashSet<String>) -> Option<ComponentNode> {
        if visited.contains(path) {
            return None;
        }
        let mut branch = visited.clone();
        branch.insert(path.to_string());

        let children = self
            .component_children(path)
            .filter_map(|child| self.build_tree(child, &branch))
            .collect();
        Some(self.node(path, children))
    }

    /// DAG-compressed variant: one shared visited set for the whole
    /// forest; repeat occurrences become leaves.
    fn build_compressed(
        &self,
        path: &str,
        expanded: &mut HashSet<String>,
    ) -> Option<ComponentNode> {
        let first_visit = expanded.insert(path.to_string());
        let children = if first_visit {
            let child_paths: Vec<&str> = self.component_children(path).collect();
            child_paths
                .into_iter()
                .filter_map(|child| self.build_compressed(child, expanded))
                .collect()
        } else {
            Vec::new()
        };
        Some(self.node(path, children))
    }

    fn component_children<'b>(&'b self, path: &str) -> impl Iterator<Item = &'b str> + 'b {
        self.graph
            .imports_of(path)
            .iter()
            .map(|p| p.as_str())
            .filter(|p| self.components.contains(*p))
    }

    fn node(&self, path: &str, children: Vec<ComponentNode>) -> ComponentNode {
        ComponentNode {
            name: component_name(path),
            path: path.to_string(),
            size: self.index.get(path).map(|c| c.len()).unwrap_or(0),
            children,
        }
    }
}

/// Display name of a component file: base name without extension.
fn component_name(path: &str) -> String {
    let base = path.rsplit('/').next().unwrap_or(path);
    match base.rfind('.') {
        Some(i) if i > 0 => base[..i].to_string(),
        _ => base.to_string(),
    }
}
