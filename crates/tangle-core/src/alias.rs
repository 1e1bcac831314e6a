use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::index::FileIndex;
use crate::types::{Diagnostic, DiagnosticKind};

/// Manifest-style configuration sources, in priority order.
const MANIFEST_SOURCES: [&str; 2] = ["tsconfig.json", "jsconfig.json"];

/// Bundler configuration sources, consulted after the manifests.
const BUNDLER_SOURCES: [&str; 3] = ["vite.config.ts", "vite.config.js", "webpack.config.js"];

/// Ordered prefix-rewrite table, e.g. `"@/" -> "src/"`. First matching
/// prefix wins. Immutable once computed per run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AliasTable {
    entries: Vec<(String, String)>,
}

impl AliasTable {
    /// The built-in fallback used when no configuration source
    /// contributes any alias.
    pub fn default_table() -> Self {
        Self {
            entries: vec![
                ("@/".to_string(), "src/".to_string()),
                ("~/".to_string(), "src/".to_string()),
            ],
        }
    }

    /// First matching configuration source wins per prefix; later
    /// sources only fill gaps.
    fn insert_if_absent(&mut self, prefix: String, replacement: String) {
        if !self.entries.iter().any(|(p, _)| *p == prefix) {
            self.entries.push((prefix, replacement));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, r)| (p.as_str(), r.as_str()))
    }

    /// Check whether a specifier starts with any known alias prefix.
    pub fn matches(&self, specifier: &str) -> bool {
        self.entries.iter().any(|(p, _)| specifier.starts_with(p))
    }

    /// Rewrite the first matching prefix, or return `None` when no
    /// prefix applies.
    pub fn rewrite(&self, specifier: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|(p, _)| specifier.starts_with(p))
            .map(|(p, r)| format!("{r}{}", &specifier[p.len()..]))
    }
}

/// Scan the index for known configuration sources and build the alias
/// table. Parse failures in any one source are recovered locally and
/// surfaced as diagnostics; they never abort resolution.
pub fn resolve(index: &FileIndex) -> (AliasTable, Vec<Diagnostic>) {
    let mut table = AliasTable::default();
    let mut diagnostics = Vec::new();

    for name in MANIFEST_SOURCES {
        consult_source(index, name, parse_manifest, &mut table, &mut diagnostics);
    }
    for name in BUNDLER_SOURCES {
        consult_source(index, name, parse_bundler, &mut table, &mut diagnostics);
    }

    if table.is_empty() {
        table = AliasTable::default_table();
    }
    (table, diagnostics)
}

fn consult_source(
    index: &FileIndex,
    name: &str,
    parse: fn(&str) -> Option<Vec<(String, String)>>,
    table: &mut AliasTable,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(path) = index.find_file(name) else {
        return;
    };
    let Some(content) = index.get(path) else {
        return;
    };
    match parse(content) {
        Some(entries) => {
            for (prefix, replacement) in entries {
                table.insert_if_absent(prefix, replacement);
            }
        }
        None => diagnostics.push(Diagnostic::new(
            DiagnosticKind::ConfigParse,
            path,
            "could not extract path aliases",
        )),
    }
}

/// Best-effort parse of a manifest-style config (`tsconfig.json` /
/// `jsconfig.json`): JSON with comments and trailing commas tolerated.
/// Returns `None` when the document cannot be parsed at all.
pub fn parse_manifest(content: &str) -> Option<Vec<(String, String)>> {
    let cleaned = strip_trailing_commas(&strip_comments(content));
    let doc: serde_json::Value = serde_json::from_str(&cleaned).ok()?;

    let options = doc.get("compilerOptions")?;
    let base_url = options
        .get("baseUrl")
        .and_then(|v| v.as_str())
        .unwrap_or(".");

    let mut entries = Vec::new();
    if let Some(paths) = options.get("paths").and_then(|v| v.as_object()) {
        for (key, targets) in paths {
            let target = targets
                .as_array()
                .and_then(|a| a.first())
                .and_then(|v| v.as_str());
            let Some(target) = target else { continue };
            let Some(prefix) = alias_prefix(key) else {
                continue;
            };
            entries.push((prefix, join_base_url(base_url, target)));
        }
    }
    Some(entries)
}

/// Best-effort extraction of alias pairs from a bundler config.
/// The file is never executed; pairs are pulled out of the `alias`
/// object literal with targeted patterns. Returns `None` when an alias
/// block is present but its braces never close.
pub fn parse_bundler(content: &str) -> Option<Vec<(String, String)>> {
    static PAIR: OnceLock<Regex> = OnceLock::new();
    static FIND_REPLACE: OnceLock<Regex> = OnceLock::new();
    let pair = PAIR.get_or_init(|| {
        // Value side tolerates commas inside one level of parentheses,
        // e.g. `path.resolve(__dirname, 'src')`.
        Regex::new(r#"['"]?([@~][\w./-]*|[\w./-]+)['"]?\s*:\s*((?:\([^)]*\)|[^,\n}(])+)"#)
            .expect("valid regex")
    });
    let find_replace = FIND_REPLACE.get_or_init(|| {
        Regex::new(
            r#"find\s*:\s*['"]([^'"]+)['"]\s*,\s*replacement\s*:\s*[^,}]*?['"]([^'"]+)['"]"#,
        )
        .expect("valid regex")
    });

    let Some(start) = find_alias_block(content) else {
        return Some(Vec::new());
    };
    let block = balanced_braces(&content[start..])?;

    let mut entries = Vec::new();
    // Vite array form: { find: '@', replacement: '/src' }
    for cap in find_replace.captures_iter(block) {
        if let Some(prefix) = alias_prefix(&cap[1]) {
            entries.push((prefix, clean_alias_target(&cap[2])));
        }
    }
    if entries.is_empty() {
        for cap in pair.captures_iter(block) {
            let key = &cap[1];
            if key == "find" || key == "replacement" {
                continue;
            }
            let Some(target) = last_quoted(&cap[2]) else {
                continue;
            };
            if let Some(prefix) = alias_prefix(key) {
                entries.push((prefix, clean_alias_target(target)));
            }
        }
    }
    Some(entries)
}

/// Locate the opening brace of an `alias: {` or `alias = {` object.
fn find_alias_block(content: &str) -> Option<usize> {
    static ALIAS: OnceLock<Regex> = OnceLock::new();
    let alias = ALIAS
        .get_or_init(|| Regex::new(r"\balias\s*[:=]\s*\{").expect("valid regex"));
    let m = alias.find(content)?;
    Some(m.end() - 1)
}

/// Return the brace-balanced slice starting at an opening `{`.
fn balanced_braces(s: &str) -> Option<&str> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Normalize an alias key into a rewrite prefix: `"@/*"` and `"@"`
/// both become `"@/"`.
fn alias_prefix(key: &str) -> Option<String> {
    let trimmed = key.trim_end_matches('*');
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.ends_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("{trimmed}/"))
    }
}

/// Take the last quoted string out of a bundler value expression,
/// e.g. `path.resolve(__dirname, 'src')` yields `src`.
fn last_quoted(value: &str) -> Option<&str> {
    static QUOTED: OnceLock<Regex> = OnceLock::new();
    let quoted = QUOTED.get_or_init(|| Regex::new(r#"['"]([^'"]*)['"]"#).expect("valid regex"));
    quoted
        .captures_iter(value)
        .last()
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Normalize an alias target into an archive-relative directory prefix.
fn clean_alias_target(target: &str) -> String {
    let cleaned = target
        .trim()
        .trim_start_matches("./")
        .trim_start_matches('/')
        .trim_end_matches('*');
    if cleaned.is_empty() {
        String::new()
    } else if cleaned.ends_with('/') {
        cleaned.to_string()
    } else {
        format!("{cleaned}/")
    }
}

/// Join a `baseUrl` with a `paths` target and normalize to a prefix.
fn join_base_url(base_url: &str, target: &str) -> String {
    let base = base_url.trim_start_matches("./").trim_matches('/');
    let target = target.trim_start_matches("./");
    if base.is_empty() || base == "." {
        clean_alias_target(target)
    } else {
        clean_alias_target(&format!("{base}/{target}"))
    }
}

/// Strip `//` and `/* */` comments outside string literals.
fn strip_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
                continue;
            }
            if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == '/' && chars.peek() == Some(&'/') {
            for skipped in chars.by_ref() {
                if skipped == '\n' {
                    out.push('\n');
                    break;
                }
            }
        } else if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            let mut prev = ' ';
            for skipped in chars.by_ref() {
                if prev == '*' && skipped == '/' {
                    break;
                }
                prev = skipped;
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Drop commas that directly precede a closing `}` or `]`, outside strings.
fn strip_trailing_commas(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_string = false;
    let mut prev = ' ';

    for (i, c) in content.char_indices() {
        if in_string {
            out.push(c);
            if c == '"' && prev != '\\' {
                in_string = false;
            }
            prev = c;
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = content[i + 1..].chars().find(|ch| !ch.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
        prev = c;
    }
    out
}
