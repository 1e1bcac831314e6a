use crate::alias::AliasTable;
use crate::index::FileIndex;

/// Outcome of resolving one module specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Resolved to a file present in the index.
    File(String),
    /// A bare package reference. External dependencies are out of
    /// scope by design: not an edge, not an error, not a diagnostic.
    External,
    /// A relative, rooted, or alias specifier that matched no file.
    Unresolved,
}

/// Candidate suffixes probed in fixed order: exact match first, then
/// component-file extensions, then the same extensions under `/index`.
const PROBE_SUFFIXES: [&str; 9] = [
    "",
    ".tsx",
    ".ts",
    ".jsx",
    ".js",
    "/index.tsx",
    "/index.ts",
    "/index.jsx",
    "/index.js",
];

/// Resolve a module specifier relative to the importing file.
pub fn resolve(
    specifier: &str,
    from_path: &str,
    index: &FileIndex,
    aliases: &AliasTable,
) -> Resolution {
    let candidate = if let Some(rewritten) = aliases.rewrite(specifier) {
        // Alias targets are archive-root relative.
        rewritten
    } else if specifier.starts_with('.') {
        resolve_relative(parent_dir(from_path), specifier)
    } else if let Some(rooted) = specifier.strip_prefix('/') {
        rooted.to_string()
    } else {
        return Resolution::External;
    };

    probe(&candidate, index)
        .map(Resolution::File)
        .unwrap_or(Resolution::Unresolved)
}

fn probe(candidate: &str, index: &FileIndex) -> Option<String> {
    for suffix in PROBE_SUFFIXES {
        let probed = format!("{candidate}{suffix}");
        if index.has(&probed) {
            return Some(probed);
        }
    }
    None
}

fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[..i],
        None => "",
    }
}

/// Standard segment algebra: `..` pops one segment, `.` is a no-op.
/// Excess `..` segments past the archive root are dropped.
fn resolve_relative(dir: &str, specifier: &str) -> String {
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in specifier.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArchiveEntry;
    use globset::GlobSetBuilder;

    fn index_of(paths: &[&str]) -> FileIndex {
        let entries = paths
            .iter()
            .map(|p| ArchiveEntry {
                path: p.to_string(),
                content: String::new(),
            })
            .collect();
        FileIndex::build(entries, &GlobSetBuilder::new().build().unwrap())
    }

    fn no_aliases() -> AliasTable {
        AliasTable::default()
    }

    #[test]
    fn test_relative_sibling() {
        let index = index_of(&["src/components/Foo.tsx", "src/components/Bar.tsx"]);
        assert_eq!(
            resolve("./Foo", "src/components/Bar.tsx", &index, &no_aliases()),
            Resolution::File("src/components/Foo.tsx".to_string())
        );
    }

    #[test]
    fn test_relative_parent_traversal() {
        let index = index_of(&["src/lib/core.ts", "src/components/App.tsx"]);
        assert_eq!(
            resolve(
                "../lib/core",
                "src/components/App.tsx",
                &index,
                &no_aliases()
            ),
            Resolution::File("src/lib/core.ts".to_string())
        );
    }

    #[test]
    fn test_alias_rewrite() {
        let index = index_of(&["src/utils/helper.ts"]);
        let table = AliasTable::default_table();
        assert_eq!(
            resolve("@/utils/helper", "pages/Home.tsx", &index, &table),
            Resolution::File("src/utils/helper.ts".to_string())
        );
    }

    #[test]
    fn test_bare_specifier_is_external() {
        let index = index_of(&["src/app.ts"]);
        assert_eq!(
            resolve("react", "src/app.ts", &index, &no_aliases()),
            Resolution::External
        );
        assert_eq!(
            resolve("lodash/debounce", "src/app.ts", &index, &no_aliases()),
            Resolution::External
        );
    }

    #[test]
    fn test_rooted_specifier() {
        let index = index_of(&["src/app.ts"]);
        assert_eq!(
            resolve("/src/app", "pages/index.tsx", &index, &no_aliases()),
            Resolution::File("src/app.ts".to_string())
        );
    }

    #[test]
    fn test_index_probe_order() {
        let index = index_of(&["src/widgets/index.ts", "src/widgets.ts"]);
        // Extension probes come before /index probes.
        assert_eq!(
            resolve("./widgets", "src/app.ts", &index, &no_aliases()),
            Resolution::File("src/widgets.ts".to_string())
        );

        let index = index_of(&["src/widgets/index.ts"]);
        assert_eq!(
            resolve("./widgets", "src/app.ts", &index, &no_aliases()),
            Resolution::File("src/widgets/index.ts".to_string())
        );
    }

    #[test]
    fn test_exact_match_beats_extension_probe() {
        let index = index_of(&["src/styles.css", "src/styles.css.ts"]);
        assert_eq!(
            resolve("./styles.css", "src/app.ts", &index, &no_aliases()),
            Resolution::File("src/styles.css".to_string())
        );
    }

    #[test]
    fn test_typed_extension_probed_before_untyped() {
        let index = index_of(&["src/Foo.tsx", "src/Foo.js"]);
        assert_eq!(
            resolve("./Foo", "src/app.ts", &index, &no_aliases()),
            Resolution::File("src/Foo.tsx".to_string())
        );
    }

    #[test]
    fn test_unresolved_relative() {
        let index = index_of(&["src/app.ts"]);
        assert_eq!(
            resolve("./missing", "src/app.ts", &index, &no_aliases()),
            Resolution::Unresolved
        );
    }

    #[test]
    fn test_excess_parent_segments_clamp_at_root() {
        let index = index_of(&["app.ts"]);
        assert_eq!(
            resolve("../../../app", "src/deep/mod.ts", &index, &no_aliases()),
            Resolution::File("app.ts".to_string())
        );
    }
}
