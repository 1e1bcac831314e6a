use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use tangle_core::config::Config;
use tangle_core::pipeline::AnalysisPipeline;
use tangle_core::types::AnalysisReport;

use tangle_js::{JsComponentClassifier, JsImportExtractor};
use tangle_report::{json, text};

#[derive(Parser)]
#[command(name = "tangle")]
#[command(about = "Analyze import structure of web projects packaged as zip archives")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an archive and print a full dependency report
    Analyze {
        /// Path to the project archive (.zip)
        archive: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Config file path (defaults to .tangle.toml near the archive)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Analyze and exit with code 0 (pass) or 1 (too many cycles)
    Check {
        /// Path to the project archive (.zip)
        archive: PathBuf,
        /// Maximum number of import cycles allowed before failing
        #[arg(long, default_value_t = 0)]
        max_cycles: usize,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Create a default .tangle.toml configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            archive,
            format,
            config,
        } => cmd_analyze(&archive, format, config.as_deref()),
        Commands::Check {
            archive,
            max_cycles,
            format,
            config,
        } => cmd_check(&archive, max_cycles, format, config.as_deref()),
        Commands::Init { force } => cmd_init(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(2);
    }
}

fn cmd_analyze(archive: &Path, format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(archive, config_path)?;
    let report = run_analysis(archive, config)?;
    let rendered = match format {
        OutputFormat::Text => text::format_report(&report),
        OutputFormat::Json => json::format_report(&report, false),
    };
    print!("{rendered}");
    Ok(())
}

fn cmd_check(
    archive: &Path,
    max_cycles: usize,
    format: OutputFormat,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(archive, config_path)?;
    let report = run_analysis(archive, config)?;
    let (rendered, passed) = match format {
        OutputFormat::Text => text::format_check(&report, max_cycles),
        OutputFormat::Json => json::format_check(&report, max_cycles, false),
    };
    print!("{rendered}");
    if !passed {
        process::exit(1);
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let target = PathBuf::from(".tangle.toml");
    if target.exists() && !force {
        anyhow::bail!(".tangle.toml already exists. Use --force to overwrite.");
    }
    std::fs::write(&target, Config::default_toml())?;
    println!("Created .tangle.toml with default configuration.");
    Ok(())
}

fn load_config(archive: &Path, config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(p) => Config::load(p),
        None => {
            let dir = archive.parent().filter(|p| !p.as_os_str().is_empty());
            Ok(Config::load_or_default(dir.unwrap_or(Path::new("."))))
        }
    }
}

fn run_analysis(archive: &Path, config: Config) -> Result<AnalysisReport> {
    let buffer = std::fs::read(archive)
        .with_context(|| format!("failed to read archive '{}'", archive.display()))?;

    let extractor = JsImportExtractor::new().context("failed to initialize import extractor")?;
    let classifier =
        JsComponentClassifier::new().context("failed to initialize component classifier")?;

    let pipeline = AnalysisPipeline::new(Box::new(extractor), Box::new(classifier), config);
    let report = pipeline
        .analyze(&buffer)
        .with_context(|| format!("failed to analyze '{}'", archive.display()))?;
    Ok(report)
}
