use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::alias::AliasTable;
use crate::extract::ImportExtractor;
use crate::index::FileIndex;
use crate::resolve::{self, Resolution};
use crate::types::{Diagnostic, DiagnosticKind, GraphEntry, ImportKind, ImportSpecifier};

/// Node in the module graph: one indexed source file with its resolved
/// outgoing and derived incoming edges, in discovery order, deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileNode {
    pub path: String,
    pub imports: Vec<String>,
    pub imported_by: Vec<String>,
}

/// Edge weight: which import statement produced the edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportEdge {
    pub kind: ImportKind,
    pub specifier: String,
}

/// Directed file-to-file dependency graph. Rebuilt from scratch per
/// archive; every edge endpoint exists in the file index by construction.
pub struct ModuleGraph {
    graph: DiGraph<FileNode, ImportEdge>,
    index: HashMap<String, NodeIndex>,
    order: Vec<NodeIndex>,
    edge_set: HashSet<(NodeIndex, NodeIndex)>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            order: Vec::new(),
            edge_set: HashSet::new(),
        }
    }

    /// Add a file as a node. Returns the node index.
    pub fn add_file(&mut self, path: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(path) {
            return idx;
        }
        let idx = self.graph.add_node(FileNode {
            path: path.to_string(),
            imports: Vec::new(),
            imported_by: Vec::new(),
        });
        self.index.insert(path.to_string(), idx);
        self.order.push(idx);
        idx
    }

    /// Add a resolved import edge. Duplicate edges between the same
    /// pair of files are dropped; self-edges are kept (a file can
    /// import itself and must show up in cycle detection).
    pub fn add_import(&mut self, from: &str, to: &str, spec: &ImportSpecifier) {
        let from_idx = self.add_file(from);
        let to_idx = self.add_file(to);
        if !self.edge_set.insert((from_idx, to_idx)) {
            return;
        }
        self.graph.add_edge(
            from_idx,
            to_idx,
            ImportEdge {
                kind: spec.kind,
                specifier: spec.raw.clone(),
            },
        );
        let to_path = self.graph[to_idx].path.clone();
        let from_path = self.graph[from_idx].path.clone();
        self.graph[from_idx].imports.push(to_path);
        self.graph[to_idx].imported_by.push(from_path);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Outgoing edge count of a node.
    pub fn fan_out(&self, path: &str) -> usize {
        self.node(path).map(|n| n.imports.len()).unwrap_or(0)
    }

    /// Incoming edge count of a node.
    pub fn fan_in(&self, path: &str) -> usize {
        self.node(path).map(|n| n.imported_by.len()).unwrap_or(0)
    }

    pub fn imports_of(&self, path: &str) -> &[String] {
        self.node(path).map(|n| n.imports.as_slice()).unwrap_or(&[])
    }

    pub fn imported_by_of(&self, path: &str) -> &[String] {
        self.node(path)
            .map(|n| n.imported_by.as_slice())
            .unwrap_or(&[])
    }

    fn node(&self, path: &str) -> Option<&FileNode> {
        self.index.get(path).map(|&idx| &self.graph[idx])
    }

    /// Node paths in discovery order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|&idx| self.graph[idx].path.as_str())
    }

    /// Per-file edge lists for the result object, keyed by path.
    pub fn to_entries(&self) -> BTreeMap<String, GraphEntry> {
        self.order
            .iter()
            .map(|&idx| {
                let node = &self.graph[idx];
                (
                    node.path.clone(),
                    GraphEntry {
                        imports: node.imports.clone(),
                        imported_by: node.imported_by.clone(),
                    },
                )
            })
            .collect()
    }
}

impl Default for ModuleGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the graph: run the injected extractor over every indexed file,
/// resolve each specifier, and add deduplicated edges. Per-file
/// extraction runs in parallel; assembly is sequential over the sorted
/// file list, so the same archive always yields the same graph.
pub fn build(
    index: &FileIndex,
    aliases: &AliasTable,
    extractor: &dyn ImportExtractor,
) -> (ModuleGraph, Vec<Diagnostic>) {
    let files: Vec<(&str, &str)> = index.iter().collect();
    let extracted: Vec<Vec<ImportSpecifier>> = files
        .par_iter()
        .map(|(_, content)| extractor.extract(content))
        .collect();

    let mut graph = ModuleGraph::new();
    for (path, _) in &files {
        graph.add_file(path);
    }

    let mut diagnostics = Vec::new();
    for ((path, _), specs) in files.iter().zip(extracted) {
        let mut seen = HashSet::new();
        for spec in specs {
            if !seen.insert(spec.raw.clone()) {
                continue;
            }
            match resolve::resolve(&spec.raw, path, index, aliases) {
                Resolution::File(target) => graph.add_import(path, &target, &spec),
                // External packages are out of scope: no edge, no diagnostic.
                Resolution::External => {}
                Resolution::Unresolved => diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnresolvedImport,
                    *path,
                    spec.raw.clone(),
                )),
            }
        }
    }

    (graph, diagnostics)
}
