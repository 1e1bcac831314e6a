use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ranking::RankingLimits;

/// Top-level configuration from `.tangle.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub rankings: RankingsConfig,
    #[serde(default)]
    pub tree: TreeConfig,
}

/// Archive-level filtering applied when building the file index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "node_modules/**".to_string(),
        "dist/**".to_string(),
        "build/**".to_string(),
        ".git/**".to_string(),
    ]
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

/// Thresholds for the god-file / hub-file rankings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingsConfig {
    #[serde(default = "default_god_threshold")]
    pub god_threshold: usize,
    #[serde(default = "default_hub_threshold")]
    pub hub_threshold: usize,
    #[serde(default = "default_top")]
    pub top: usize,
}

fn default_god_threshold() -> usize {
    8
}
fn default_hub_threshold() -> usize {
    5
}
fn default_top() -> usize {
    10
}

impl Default for RankingsConfig {
    fn default() -> Self {
        Self {
            god_threshold: default_god_threshold(),
            hub_threshold: default_hub_threshold(),
            top: default_top(),
        }
    }
}

impl RankingsConfig {
    pub fn limits(&self) -> RankingLimits {
        RankingLimits {
            god_threshold: self.god_threshold,
            hub_threshold: self.hub_threshold,
            top: self.top,
        }
    }
}

/// Component-tree rendering options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeConfig {
    /// When true, a component is expanded once and later occurrences
    /// become leaves instead of duplicated subtrees.
    #[serde(default)]
    pub dag_compress: bool,
}

impl Config {
    /// Load configuration from a `.tangle.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "failed to parse '{}'. Run `tangle init` to create a valid config file",
                path.display()
            )
        })?;
        Ok(config)
    }

    /// Load from `.tangle.toml` in the given directory or any ancestor,
    /// or return defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let mut current = start.as_path();
        loop {
            let config_path = current.join(".tangle.toml");
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => config,
                    Err(e) => {
                        eprintln!(
                            "Warning: failed to load config from '{}': {e:#}. Using defaults.",
                            config_path.display()
                        );
                        Self::default()
                    }
                };
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Self::default()
    }

    /// Compile the exclude patterns into a matcher. Invalid patterns
    /// are skipped rather than failing the run.
    pub fn exclude_set(&self) -> GlobSet {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.analysis.exclude_patterns {
            if let Ok(glob) = Glob::new(pattern) {
                builder.add(glob);
            }
        }
        builder
            .build()
            .unwrap_or_else(|_| GlobSetBuilder::new().build().expect("empty globset"))
    }

    /// Generate default TOML content for `tangle init`.
    pub fn default_toml() -> String {
        r#"# Tangle - Web Project Dependency Analysis Configuration

[analysis]
# Archive paths matching these globs are never indexed
exclude_patterns = ["node_modules/**", "dist/**", "build/**", ".git/**"]

[rankings]
# Minimum fan-out to flag a file as a "god file"
god_threshold = 8
# Minimum fan-in to flag a file as a "hub file"
hub_threshold = 5
# Both rankings are truncated to this many entries
top = 10

[tree]
# Render each shared component once (true) or per importing branch (false)
dag_compress = false
"#
        .to_string()
    }
}
