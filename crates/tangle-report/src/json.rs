use serde::Serialize;

use tangle_core::types::AnalysisReport;

/// Format a full analysis report as JSON.
pub fn format_report(report: &AnalysisReport, compact: bool) -> String {
    if compact {
        serde_json::to_string(report).expect("AnalysisReport should be serializable")
    } else {
        serde_json::to_string_pretty(report).expect("AnalysisReport should be serializable")
    }
}

/// Wrapper for check output that adds pass/fail metadata.
#[derive(Debug, Serialize)]
pub struct CheckOutput<'a> {
    #[serde(flatten)]
    pub report: &'a AnalysisReport,
    pub check: CheckStatus,
}

#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub passed: bool,
    pub max_cycles: usize,
    pub cycle_count: usize,
}

/// Format a check result as JSON. Returns (json_string, passed).
pub fn format_check(report: &AnalysisReport, max_cycles: usize, compact: bool) -> (String, bool) {
    let cycle_count = report.cycles.len();
    let passed = cycle_count <= max_cycles;

    let output = CheckOutput {
        report,
        check: CheckStatus {
            passed,
            max_cycles,
            cycle_count,
        },
    };

    let json = if compact {
        serde_json::to_string(&output).expect("CheckOutput should be serializable")
    } else {
        serde_json::to_string_pretty(&output).expect("CheckOutput should be serializable")
    };

    (json, passed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tangle_core::types::{AnalysisStats, ComponentNode, RankedFile};

    fn sample_report(with_cycle: bool) -> AnalysisReport {
        let cycles = if with_cycle {
            vec![vec!["src/a.ts".to_string(), "src/b.ts".to_string()]]
        } else {
            vec![]
        };

        AnalysisReport {
            files: vec![],
            graph: Default::default(),
            cycles,
            god_files: vec![RankedFile {
                path: "src/app.ts".to_string(),
                count: 12,
            }],
            hub_files: vec![],
            component_tree: vec![ComponentNode {
                name: "App".to_string(),
                path: "src/App.tsx".to_string(),
                size: 40,
                children: vec![],
            }],
            diagnostics: vec![],
            stats: AnalysisStats {
                file_count: 2,
                edge_count: 3,
                cycle_count: usize::from(with_cycle),
            },
        }
    }

    #[test]
    fn test_format_report_valid_json() {
        let json = format_report(&sample_report(true), false);
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("should be valid JSON");
        assert!(parsed.get("cycles").is_some());
        assert!(parsed.get("god_files").is_some());
        assert_eq!(parsed["stats"]["file_count"], 2);
        assert_eq!(parsed["component_tree"][0]["name"], "App");
    }

    #[test]
    fn test_format_report_compact_is_single_line() {
        let json = format_report(&sample_report(false), true);
        assert!(!json.contains('\n'), "compact JSON should be single line");
        let _: serde_json::Value = serde_json::from_str(&json).expect("should be valid JSON");
    }

    #[test]
    fn test_format_report_pretty_is_multiline() {
        let json = format_report(&sample_report(false), false);
        assert!(json.contains('\n'), "pretty JSON should be multiline");
    }

    #[test]
    fn test_format_check_passed() {
        let (json, passed) = format_check(&sample_report(false), 0, false);
        assert!(passed);
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("should be valid JSON");
        assert_eq!(parsed["check"]["passed"], true);
        assert_eq!(parsed["check"]["cycle_count"], 0);
    }

    #[test]
    fn test_format_check_failed() {
        let (json, passed) = format_check(&sample_report(true), 0, false);
        assert!(!passed);
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("should be valid JSON");
        assert_eq!(parsed["check"]["passed"], false);
        assert_eq!(parsed["check"]["cycle_count"], 1);
        assert_eq!(parsed["check"]["max_cycles"], 0);
    }

    #[test]
    fn test_format_check_tolerates_budget() {
        let (_, passed) = format_check(&sample_report(true), 1, true);
        assert!(passed);
    }

    #[test]
    fn test_check_flattened_fields() {
        let (json, _) = format_check(&sample_report(true), 0, false);
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("should be valid JSON");
        // Flattened AnalysisReport fields sit at the top level next to
        // the check section.
        assert!(parsed.get("cycles").is_some());
        assert!(parsed.get("stats").is_some());
        assert!(parsed.get("check").is_some());
    }
}
