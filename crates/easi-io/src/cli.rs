use crate::report::{render_assessment, render_selection};
use crate::{env_config, load_facility, RunManifest};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use easi_engine::{Engine, EngineConfig};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "easi")]
#[command(about = "EASI - Estimate of Adversary Sequence Interruption")]
#[command(long_about = "Ranks every adversary path through a layered facility by its probability of interruption")]
pub struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate all paths and report the Most Vulnerable Path
    Assess {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Evaluate one explicit choice of task per layer
    Path {
        #[command(flatten)]
        common: CommonArgs,

        /// Task id per layer, in layer order (repeat or comma-separate)
        #[arg(long = "select", value_delimiter = ',', required = true)]
        select: Vec<String>,
    },
}

#[derive(clap::Args, Clone, Debug)]
pub struct CommonArgs {
    /// Facility JSON file
    #[arg(long, short)]
    pub input: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Write a run manifest (JSON)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Evaluate paths on the current thread only
    #[arg(long, conflicts_with = "parallel")]
    pub sequential: bool,

    /// Evaluate paths on the rayon pool even if EASI_SEQUENTIAL is set
    #[arg(long)]
    pub parallel: bool,

    /// Worker threads (default: EASI_THREADS, RAYON_NUM_THREADS, or all cores)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Separator between task ids in path labels
    #[arg(long, default_value = easi_core::LABEL_SEPARATOR)]
    pub separator: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl CommonArgs {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            parallel: resolve_parallel(self.parallel, self.sequential, env_config::sequential_from_env()),
            label_separator: self.separator.clone(),
        }
    }
}

/// Flags win over `EASI_SEQUENTIAL`.
fn resolve_parallel(parallel_flag: bool, sequential_flag: bool, sequential_env: bool) -> bool {
    if parallel_flag {
        true
    } else if sequential_flag {
        false
    } else {
        !sequential_env
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Assess { common } => run_assess_command(&common),
        Commands::Path { common, select } => run_path_command(&common, &select),
    }
}

pub fn run_assess_command(args: &CommonArgs) -> anyhow::Result<()> {
    let config = args.engine_config();
    if config.parallel {
        env_config::init_rayon_threads_lenient(args.threads);
    }

    let facility = load_facility(&args.input)?;
    let assessment = Engine::new(config.clone()).assess(&facility);

    let body = match args.format {
        OutputFormat::Text => render_assessment(&assessment),
        OutputFormat::Json => to_json(&assessment)?,
    };
    emit(args, &body)?;

    if let Some(path) = &args.manifest {
        let mut manifest = RunManifest::new("assess", &args.input, &facility, config.parallel);
        manifest.record_assessment(&assessment);
        manifest.save_to_file(path)?;
        tracing::info!(manifest = %path.display(), "wrote manifest");
    }
    Ok(())
}

pub fn run_path_command(args: &CommonArgs, select: &[String]) -> anyhow::Result<()> {
    let config = args.engine_config();
    let facility = load_facility(&args.input)?;
    let selection = Engine::new(config.clone()).evaluate_selection(&facility, select);

    let body = match args.format {
        OutputFormat::Text => render_selection(&selection),
        OutputFormat::Json => to_json(&selection)?,
    };
    emit(args, &body)?;

    if let Some(path) = &args.manifest {
        let mut manifest = RunManifest::new("path", &args.input, &facility, false);
        manifest.record_selection(&selection);
        manifest.save_to_file(path)?;
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

fn emit(args: &CommonArgs, body: &str) -> anyhow::Result<()> {
    match &args.out {
        Some(path) => {
            std::fs::write(path, body).with_context(|| format!("writing report {}", path.display()))?;
            tracing::info!(out = %path.display(), "wrote report");
        }
        None => print!("{}", body),
    }
    Ok(())
}
