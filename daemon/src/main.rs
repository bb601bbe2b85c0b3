//! Fradium CLI: inspect the engine configuration and run scripted simulations.

mod scenario;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use fradium_engine::{init_logging, EngineConfig};

use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "fradium", about = "Fradium address trust engine")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "FRADIUM_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "FRADIUM_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "FRADIUM_LOG_FORMAT")]
    log_format: Option<String>,

    /// Minimum number of distinct voters for a decisive verdict.
    #[arg(long, env = "FRADIUM_QUORUM")]
    quorum: Option<u32>,

    /// Print Prometheus metrics to stderr after a simulation.
    #[arg(long, env = "FRADIUM_ENABLE_METRICS")]
    metrics: bool,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the effective configuration as TOML.
    Config,
    /// Run a JSON scenario against in-memory collaborators.
    Simulate {
        /// Scenario file.
        scenario: PathBuf,
    },
}

impl Cli {
    /// The file configuration (or defaults) with CLI overrides applied.
    fn effective_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        if let Some(quorum) = self.quorum {
            config.params.minimum_quorum = quorum;
        }
        config.enable_metrics |= self.metrics;
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.effective_config()?;
    init_logging(config.log_format()?, &config.log_level);

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Simulate { scenario } => {
            let loaded = Scenario::from_file(&scenario)?;
            tracing::info!(
                scenario = %scenario.display(),
                steps = loaded.steps.len(),
                quorum = config.params.minimum_quorum,
                "running simulation"
            );
            let mut stdout = std::io::stdout().lock();
            let engine = scenario::run(loaded, &config, &mut stdout).await?;
            if config.enable_metrics {
                eprint!("{}", engine.metrics_text()?);
            }
        }
    }
    Ok(())
}
