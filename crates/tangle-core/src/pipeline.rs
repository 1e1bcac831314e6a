use thiserror::Error;

use crate::alias;
use crate::archive::{self, ArchiveError};
use crate::config::Config;
use crate::cycles;
use crate::extract::{ComponentClassifier, ImportExtractor};
use crate::graph;
use crate::index::FileIndex;
use crate::ranking;
use crate::tree::ComponentTreeBuilder;
use crate::types::{AnalysisReport, AnalysisStats};

/// Failure of a whole analysis run. Only the archive stage can fail;
/// every later stage degrades instead, so callers can tell "zero usable
/// output" apart from a partial-but-useful graph.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("archive parsing failed")]
    Archive(#[from] ArchiveError),
}

/// One analysis run over one archive buffer. Every structure is built
/// fresh per call and returned on the report; no state survives between
/// invocations.
pub struct AnalysisPipeline {
    extractor: Box<dyn ImportExtractor>,
    classifier: Box<dyn ComponentClassifier>,
    config: Config,
}

impl AnalysisPipeline {
    pub fn new(
        extractor: Box<dyn ImportExtractor>,
        classifier: Box<dyn ComponentClassifier>,
        config: Config,
    ) -> Self {
        Self {
            extractor,
            classifier,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full pipeline: extraction, indexing, alias resolution,
    /// graph construction, cycle detection, ranking, tree building.
    pub fn analyze(&self, buffer: &[u8]) -> Result<AnalysisReport, PipelineError> {
        let extraction = archive::extract(buffer)?;
        let mut diagnostics = extraction.warnings;

        let index = FileIndex::build(extraction.entries, &self.config.exclude_set());

        let (aliases, alias_diagnostics) = alias::resolve(&index);
        diagnostics.extend(alias_diagnostics);

        let (graph, graph_diagnostics) = graph::build(&index, &aliases, self.extractor.as_ref());
        diagnostics.extend(graph_diagnostics);

        let cycles = cycles::find_cycles(&graph);
        let rankings = ranking::rank(&graph, &self.config.rankings.limits());
        let component_tree = ComponentTreeBuilder::new(
            &graph,
            &index,
            self.classifier.as_ref(),
            self.config.tree.dag_compress,
        )
        .build_forest();

        let stats = AnalysisStats {
            file_count: index.len(),
            edge_count: graph.edge_count(),
            cycle_count: cycles.len(),
        };

        Ok(AnalysisReport {
            files: index.to_source_files(),
            graph: graph.to_entries(),
            cycles,
            god_files: rankings.god_files,
            hub_files: rankings.hub_files,
            component_tree,
            diagnostics,
            stats,
        })
    }
}
