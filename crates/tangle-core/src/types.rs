use serde::{Deserialize, Serialize};
use std::fmt;

/// One file record extracted from the archive container.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Path as stored in the archive, separator-normalized to `/`.
    pub path: String,
    /// Decoded text content. Entries that fail UTF-8 decoding are
    /// dropped during extraction and never reach this type.
    pub content: String,
}

/// A source file owned by the file index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

/// Kind of import statement a specifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Default,
    Named,
    Dynamic,
}

/// A raw module specifier found in a file, before resolution.
/// Transient: produced and consumed within one graph-build pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpecifier {
    pub raw: String,
    pub kind: ImportKind,
    /// Local binding name, empty for side-effect imports.
    pub local_name: String,
}

impl ImportSpecifier {
    pub fn new(raw: impl Into<String>, kind: ImportKind, local_name: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            kind,
            local_name: local_name.into(),
        }
    }
}

/// Category of a recovered-local problem encountered during analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An archive entry that could not be decompressed or decoded.
    CorruptEntry,
    /// An archive entry with a compression method we do not support.
    UnsupportedCompression,
    /// An alias configuration source that failed to parse.
    ConfigParse,
    /// A relative or alias specifier that matched no file in the index.
    /// Bare package specifiers are external by design and never reported.
    UnresolvedImport,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::CorruptEntry => write!(f, "corrupt entry"),
            DiagnosticKind::UnsupportedCompression => write!(f, "unsupported compression"),
            DiagnosticKind::ConfigParse => write!(f, "config parse"),
            DiagnosticKind::UnresolvedImport => write!(f, "unresolved import"),
        }
    }
}

/// A structured warning. Diagnostics are returned as data on the
/// report; core modules never write to a log stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// File or entry the problem was observed in.
    pub path: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            detail: detail.into(),
        }
    }
}

/// Outgoing and incoming edges of one graph node, as exposed on the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEntry {
    pub imports: Vec<String>,
    pub imported_by: Vec<String>,
}

/// A ranked file with its fan-out or fan-in count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedFile {
    pub path: String,
    pub count: usize,
}

/// Node in the recursive component usage tree. Derived view only:
/// the same file may appear in multiple branches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentNode {
    pub name: String,
    pub path: String,
    /// Content length in bytes.
    pub size: usize,
    pub children: Vec<ComponentNode>,
}

/// Summary counts so renderers need not recompute them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub file_count: usize,
    pub edge_count: usize,
    pub cycle_count: usize,
}

/// Full result of one analysis run. Consumed by the report crate and
/// discarded afterwards; nothing is cached across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub files: Vec<SourceFile>,
    pub graph: std::collections::BTreeMap<String, GraphEntry>,
    pub cycles: Vec<Vec<String>>,
    pub god_files: Vec<RankedFile>,
    pub hub_files: Vec<RankedFile>,
    pub component_tree: Vec<ComponentNode>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: AnalysisStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_kind_display() {
        assert_eq!(DiagnosticKind::CorruptEntry.to_string(), "corrupt entry");
        assert_eq!(
            DiagnosticKind::UnresolvedImport.to_string(),
            "unresolved import"
        );
    }

    #[test]
    fn test_import_specifier_new() {
        let spec = ImportSpecifier::new("./foo", ImportKind::Named, "foo");
        assert_eq!(spec.raw, "./foo");
        assert_eq!(spec.kind, ImportKind::Named);
        assert_eq!(spec.local_name, "foo");
    }

    #[test]
    fn test_report_serializes() {
        let report = AnalysisReport {
            files: vec![SourceFile {
                path: "src/app.ts".to_string(),
                content: String::new(),
            }],
            graph: Default::default(),
            cycles: vec![],
            god_files: vec![],
            hub_files: vec![],
            component_tree: vec![],
            diagnostics: vec![],
            stats: AnalysisStats::default(),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("src/app.ts"));
    }
}
