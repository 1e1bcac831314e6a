pub mod alias;
pub mod archive;
pub mod config;
pub mod cycles;
pub mod extract;
pub mod graph;
pub mod index;
pub mod pipeline;
pub mod ranking;
pub mod resolve;
pub mod tree;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use alias::AliasTable;
pub use archive::ArchiveError;
pub use config::Config;
pub use extract::{ComponentClassifier, ImportExtractor};
pub use graph::ModuleGraph;
pub use index::FileIndex;
pub use pipeline::{AnalysisPipeline, PipelineError};
pub use types::*;
