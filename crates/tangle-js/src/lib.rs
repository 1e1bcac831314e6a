use anyhow::{Context, Result};
use regex::Regex;

use tangle_core::extract::{ComponentClassifier, ImportExtractor};
use tangle_core::types::{ImportKind, ImportSpecifier};

/// Regex-based import extraction for JavaScript/TypeScript sources.
///
/// Deliberately not a parser: it recognizes the statement shapes that
/// matter for dependency edges (default, named, namespace, side-effect,
/// dynamic, `require`, and `export ... from` re-exports) and nothing
/// else. The core treats extraction as an injected capability, so this
/// can be replaced by a real parser without touching graph code.
pub struct JsImportExtractor {
    default_import: Regex,
    named_import: Regex,
    namespace_import: Regex,
    side_effect: Regex,
    dynamic_import: Regex,
    require_call: Regex,
    export_from: Regex,
}

impl JsImportExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            default_import: Regex::new(
                r#"import\s+(?:type\s+)?([A-Za-z_$][\w$]*)\s+from\s+['"]([^'"]+)['"]"#,
            )
            .context("failed to compile default import pattern")?,
            named_import: Regex::new(
                r#"import\s+(?:type\s+)?(?:[A-Za-z_$][\w$]*\s*,\s*)?\{([^}]*)\}\s*from\s+['"]([^'"]+)['"]"#,
            )
            .context("failed to compile named import pattern")?,
            namespace_import: Regex::new(
                r#"import\s+(?:type\s+)?\*\s*as\s+([A-Za-z_$][\w$]*)\s+from\s+['"]([^'"]+)['"]"#,
            )
            .context("failed to compile namespace import pattern")?,
            side_effect: Regex::new(r#"import\s+['"]([^'"]+)['"]"#)
                .context("failed to compile side-effect import pattern")?,
            dynamic_import: Regex::new(r#"import\s*\(\s*['"]([^'"]+)['"]\s*\)"#)
                .context("failed to compile dynamic import pattern")?,
            require_call: Regex::new(r#"\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#)
                .context("failed to compile require pattern")?,
            export_from: Regex::new(
                r#"export\s+(?:\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s+from\s+['"]([^'"]+)['"]"#,
            )
            .context("failed to compile re-export pattern")?,
        })
    }
}

impl ImportExtractor for JsImportExtractor {
    fn name(&self) -> &'static str {
        "js-regex"
    }

    fn extract(&self, content: &str) -> Vec<ImportSpecifier> {
        let mut specs = Vec::new();

        for cap in self.default_import.captures_iter(content) {
            specs.push(ImportSpecifier::new(&cap[2], ImportKind::Default, &cap[1]));
        }
        for cap in self.namespace_import.captures_iter(content) {
            specs.push(ImportSpecifier::new(&cap[2], ImportKind::Default, &cap[1]));
        }
        for cap in self.named_import.captures_iter(content) {
            let first_name = cap[1]
                .split(',')
                .next()
                .map(|n| n.trim().to_string())
                .unwrap_or_default();
            specs.push(ImportSpecifier::new(&cap[2], ImportKind::Named, first_name));
        }
        for cap in self.side_effect.captures_iter(content) {
            specs.push(ImportSpecifier::new(&cap[1], ImportKind::Default, ""));
        }
        for cap in self.export_from.captures_iter(content) {
            specs.push(ImportSpecifier::new(&cap[1], ImportKind::Named, ""));
        }
        for cap in self.dynamic_import.captures_iter(content) {
            specs.push(ImportSpecifier::new(&cap[1], ImportKind::Dynamic, ""));
        }
        for cap in self.require_call.captures_iter(content) {
            specs.push(ImportSpecifier::new(&cap[1], ImportKind::Dynamic, ""));
        }

        specs
    }
}

/// Heuristic UI-component classification over naming and markup
/// conventions. Framework single-file components always count; plain
/// modules count when they are PascalCase-named and contain JSX-looking
/// markup.
pub struct JsComponentClassifier {
    jsx_marker: Regex,
}

impl JsComponentClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            jsx_marker: Regex::new(r"<[A-Z][A-Za-z0-9]*[\s/>]|createElement\s*\(")
                .context("failed to compile JSX marker pattern")?,
        })
    }
}

impl ComponentClassifier for JsComponentClassifier {
    fn is_component(&self, path: &str, content: &str) -> bool {
        let base = path.rsplit('/').next().unwrap_or(path);
        let pascal = base.chars().next().is_some_and(|c| c.is_ascii_uppercase());

        if path.ends_with(".vue") || path.ends_with(".svelte") {
            return true;
        }
        if path.ends_with(".tsx") || path.ends_with(".jsx") {
            return pascal;
        }
        if path.ends_with(".ts") || path.ends_with(".js") {
            return pascal && self.jsx_marker.is_match(content);
        }
        false
    }
}
