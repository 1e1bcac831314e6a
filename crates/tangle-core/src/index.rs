use std::collections::BTreeMap;

use globset::GlobSet;

use crate::types::{ArchiveEntry, SourceFile};

/// Lookup structure over `normalized path -> content`, built once from
/// archive extraction output. Keys are archive-relative, forward-slash
/// separated, with no leading slash. Iteration order is sorted so the
/// rest of the pipeline is deterministic regardless of extraction order.
#[derive(Debug, Default)]
pub struct FileIndex {
    files: BTreeMap<String, String>,
}

/// Strip the leading-slash convention and normalize separators.
pub fn normalize_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    normalized.trim_start_matches('/').to_string()
}

impl FileIndex {
    /// Build an index from extracted entries. Empty input yields an
    /// empty index, not an error. Paths matching `exclude` are dropped.
    pub fn build(entries: Vec<ArchiveEntry>, exclude: &GlobSet) -> Self {
        let mut files = BTreeMap::new();
        for entry in entries {
            let path = normalize_path(&entry.path);
            if path.is_empty() || exclude.is_match(&path) {
                continue;
            }
            files.insert(path, entry.content);
        }
        Self { files }
    }

    pub fn has(&self, path: &str) -> bool {
        self.files.contains_key(&normalize_path(path))
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(&normalize_path(path)).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate `(path, content)` in sorted path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|p| p.as_str())
    }

    /// Find the shallowest file with the given name, e.g. a root-level
    /// `tsconfig.json` beats one nested in a sub-package.
    pub fn find_file(&self, name: &str) -> Option<&str> {
        self.files
            .keys()
            .filter(|p| {
                p.as_str() == name || p.rsplit('/').next().is_some_and(|base| base == name)
            })
            .min_by_key(|p| (p.matches('/').count(), p.as_str()))
            .map(|p| p.as_str())
    }

    /// Snapshot of the index contents for the result object.
    pub fn to_source_files(&self) -> Vec<SourceFile> {
        self.files
            .iter()
            .map(|(path, content)| SourceFile {
                path: path.clone(),
                content: content.clone(),
            })
            .collect()
    }
}
