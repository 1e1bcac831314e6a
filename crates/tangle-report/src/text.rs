use colored::Colorize;

use tangle_core::types::{AnalysisReport, ComponentNode, RankedFile};

/// Format a full analysis report for terminal output.
pub fn format_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    // Header
    out.push_str(&format!("\n{}\n", "Tangle - Dependency Analysis".bold()));
    out.push_str(&format!("{}\n\n", "=".repeat(40)));

    // Stats
    out.push_str(&format!(
        "{}: {} files, {} import edges, {} cycles\n",
        "Summary".bold(),
        report.stats.file_count,
        report.stats.edge_count,
        report.stats.cycle_count,
    ));

    // Cycles
    if report.cycles.is_empty() {
        out.push_str(&format!("\n{}\n", "No import cycles found!".green().bold()));
    } else {
        out.push_str(&format!(
            "\n{} ({} found)\n{}\n",
            "Import Cycles".red().bold(),
            report.cycles.len(),
            "-".repeat(40),
        ));
        for cycle in &report.cycles {
            let mut path = cycle.join(" -> ");
            if let Some(first) = cycle.first() {
                path.push_str(" -> ");
                path.push_str(first);
            }
            out.push_str(&format!("  {path}\n"));
        }
    }

    // Rankings
    out.push_str(&format_ranking(
        "God Files",
        "fan-out",
        &report.god_files,
        "no files above the fan-out threshold",
    ));
    out.push_str(&format_ranking(
        "Hub Files",
        "fan-in",
        &report.hub_files,
        "no files above the fan-in threshold",
    ));

    // Component tree
    if !report.component_tree.is_empty() {
        out.push_str(&format!(
            "\n{}\n{}\n",
            "Component Tree".bold(),
            "-".repeat(40),
        ));
        for root in &report.component_tree {
            push_tree_node(&mut out, root, 1);
        }
    }

    // Diagnostics
    if !report.diagnostics.is_empty() {
        out.push_str(&format!(
            "\n{} ({})\n{}\n",
            "Warnings".yellow().bold(),
            report.diagnostics.len(),
            "-".repeat(40),
        ));
        for d in &report.diagnostics {
            out.push_str(&format!("  [{}] {}: {}\n", d.kind, d.path, d.detail));
        }
    }

    out.push('\n');
    out
}

fn format_ranking(title: &str, metric: &str, ranked: &[RankedFile], empty_msg: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n{}\n", title.bold(), "-".repeat(40)));
    if ranked.is_empty() {
        out.push_str(&format!("  {empty_msg}\n"));
        return out;
    }
    for (i, file) in ranked.iter().enumerate() {
        out.push_str(&format!(
            "  {:>2}. {} ({metric} {})\n",
            i + 1,
            file.path,
            file.count,
        ));
    }
    out
}

fn push_tree_node(out: &mut String, node: &ComponentNode, depth: usize) {
    out.push_str(&format!(
        "{}{} ({}, {} lines)\n",
        "  ".repeat(depth),
        node.name.cyan(),
        node.path,
        node.size,
    ));
    for child in &node.children {
        push_tree_node(out, child, depth + 1);
    }
}

/// Format a check result for CI use. Returns (text, passed).
pub fn format_check(report: &AnalysisReport, max_cycles: usize) -> (String, bool) {
    let passed = report.cycles.len() <= max_cycles;

    let mut out = format_report(report);

    if passed {
        out.push_str(&format!("{}\n", "CHECK PASSED".green().bold()));
    } else {
        out.push_str(&format!(
            "{}: {} cycle(s) found, at most {} allowed\n",
            "CHECK FAILED".red().bold(),
            report.cycles.len(),
            max_cycles,
        ));
    }

    (out, passed)
}
