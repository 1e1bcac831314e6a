use crate::types::ImportSpecifier;

/// Import-statement extraction, injected into the graph build so the
/// core is decoupled from any one syntax-detection strategy. The
/// default implementation lives in `tangle-js`; a real parser can be
/// swapped in without touching graph code.
pub trait ImportExtractor: Send + Sync {
    /// Short name for the strategy (e.g. "js-regex").
    fn name(&self) -> &'static str;

    /// Extract every module specifier mentioned in the file content.
    fn extract(&self, content: &str) -> Vec<ImportSpecifier>;
}

/// Decides whether a file counts as a UI component for the usage tree.
/// A heuristic over naming and markup conventions, injected alongside
/// the extractor.
pub trait ComponentClassifier: Send + Sync {
    fn is_component(&self, path: &str, content: &str) -> bool;
}
