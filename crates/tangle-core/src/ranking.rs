use crate::graph::ModuleGraph;
use crate::types::RankedFile;

/// Thresholds and cap for the fan-out/fan-in rankings.
#[derive(Debug, Clone, Copy)]
pub struct RankingLimits {
    /// Minimum fan-out to count as a god file.
    pub god_threshold: usize,
    /// Minimum fan-in to count as a hub file.
    pub hub_threshold: usize,
    /// Both lists are truncated to this many entries.
    pub top: usize,
}

impl Default for RankingLimits {
    fn default() -> Self {
        Self {
            god_threshold: 8,
            hub_threshold: 5,
            top: 10,
        }
    }
}

/// The two rankings: high fan-out ("god files") and high fan-in
/// ("hub files"). Pure projections of the graph.
#[derive(Debug, Clone, Default)]
pub struct Rankings {
    pub god_files: Vec<RankedFile>,
    pub hub_files: Vec<RankedFile>,
}

/// Rank nodes by fan-out and fan-in. Sorted descending by count, ties
/// broken by discovery order (stable sort), truncated to the cap.
pub fn rank(graph: &ModuleGraph, limits: &RankingLimits) -> Rankings {
    Rankings {
        god_files: rank_by(graph, limits.god_threshold, limits.top, |g, p| g.fan_out(p)),
        hub_files: rank_by(graph, limits.hub_threshold, limits.top, |g, p| g.fan_in(p)),
    }
}

fn rank_by(
    graph: &ModuleGraph,
    threshold: usize,
    top: usize,
    count: impl Fn(&ModuleGraph, &str) -> usize,
) -> Vec<RankedFile> {
    let mut ranked: Vec<RankedFile> = graph
        .paths()
        .map(|path| RankedFile {
            path: path.to_string(),
            count: count(graph, path),
        })
        .filter(|r| r.count >= threshold)
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(top);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImportKind, ImportSpecifier};

    fn edge(graph: &mut ModuleGraph, from: &str, to: &str) {
        graph.add_import(from, to, &ImportSpecifier::new(to, ImportKind::Named, ""));
    }

    fn fan_out_graph(counts: &[(&str, usize)]) -> ModuleGraph {
        let mut graph = ModuleGraph::new();
        for (path, n) in counts {
            graph.add_file(path);
            for i in 0..*n {
                edge(&mut graph, path, &format!("dep/{path}/{i}.ts"));
            }
        }
        graph
    }

    #[test]
    fn test_god_files_threshold_and_order() {
        let graph = fan_out_graph(&[("low.ts", 2), ("big.ts", 5), ("huge.ts", 7)]);
        let rankings = rank(
            &graph,
            &RankingLimits {
                god_threshold: 3,
                hub_threshold: 1,
                top: 10,
            },
        );
        let paths: Vec<_> = rankings.god_files.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["huge.ts", "big.ts"]);
        assert_eq!(rankings.god_files[0].count, 7);
    }

    #[test]
    fn test_hub_files_count_shared_target() {
        let mut graph = ModuleGraph::new();
        for i in 0..6 {
            edge(&mut graph, &format!("src/f{i}.ts"), "src/lib/core.ts");
        }
        let rankings = rank(&graph, &RankingLimits::default());
        assert_eq!(rankings.hub_files.len(), 1);
        assert_eq!(rankings.hub_files[0].path, "src/lib/core.ts");
        assert_eq!(rankings.hub_files[0].count, 6);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let graph = fan_out_graph(&[("b.ts", 4), ("a.ts", 4)]);
        let rankings = rank(
            &graph,
            &RankingLimits {
                god_threshold: 1,
                hub_threshold: 1,
                top: 10,
            },
        );
        // b.ts was discovered first and keeps its position on a tie.
        let paths: Vec<_> = rankings.god_files.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["b.ts", "a.ts"]);
    }

    #[test]
    fn test_truncation_to_top_n() {
        let graph = fan_out_graph(&[("a.ts", 3), ("b.ts", 4), ("c.ts", 5), ("d.ts", 6)]);
        let rankings = rank(
            &graph,
            &RankingLimits {
                god_threshold: 1,
                hub_threshold: 1,
                top: 2,
            },
        );
        assert_eq!(rankings.god_files.len(), 2);
        assert_eq!(rankings.god_files[0].path, "d.ts");
    }

    #[test]
    fn test_below_threshold_is_empty() {
        let graph = fan_out_graph(&[("a.ts", 2)]);
        let rankings = rank(&graph, &RankingLimits::default());
        assert!(rankings.god_files.is_empty());
    }
}
