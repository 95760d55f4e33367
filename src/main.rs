use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;

use plagscan::{CandidateDocument, Engine, PlagscanConfig, ProgressEvent};

#[derive(Parser)]
#[command(name = "plagscan")]
#[command(author, version, about = "Compare candidate documents against a reference text", long_about = None)]
struct Cli {
    /// Reference document (plain text)
    #[arg(short, long)]
    reference: PathBuf,

    /// Candidate documents (plain text); the path is the candidate id
    #[arg(required = true)]
    candidates: Vec<PathBuf>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "info" or "plagscan=debug"
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let config = match &cli.config {
        Some(path) => PlagscanConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlagscanConfig::default(),
    };
    let engine = Engine::new(config.engine_config())?;

    let reference = fs::read_to_string(&cli.reference)
        .with_context(|| format!("reading reference {}", cli.reference.display()))?;
    let mut candidates = Vec::with_capacity(cli.candidates.len());
    for path in &cli.candidates {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading candidate {}", path.display()))?;
        candidates.push(CandidateDocument::new(path.display().to_string(), text));
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<ProgressEvent>();
    let progress = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            info!(
                completed = event.completed,
                total = event.total,
                candidate_id = %event.candidate_id,
                succeeded = event.succeeded,
                "progress"
            );
        }
    });

    let report = engine.run(&reference, candidates, Some(tx)).await?;
    progress.await?;

    let out = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{out}");
    Ok(())
}

fn init_tracing(filter: &str, json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
