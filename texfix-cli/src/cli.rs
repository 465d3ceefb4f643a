use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use texfix_core::{DocumentRewriter, RewriteConfig};

use crate::output::{save_report, save_stages};

#[derive(Parser, Debug)]
#[command(name = "texfix")]
#[command(about = "Rewrite a LaTeX report in place: float import, figure[H] blocks, node fixes")]
pub struct Args {
    /// Document to rewrite in place (defaults to the config's target, midTermReport.tex)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run all rules but leave the document untouched
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON report of what each rule did
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Dump the document after every pipeline stage to a directory
    /// (does not write the document itself)
    #[arg(long)]
    pub dump_stages: bool,

    /// Directory for stage dump output
    #[arg(long, default_value = "test_outputs/stages")]
    pub stages_dir: PathBuf,

    /// Print the effective config as YAML and exit
    #[arg(long)]
    pub show_config: bool,

    /// Log each rule as it runs
    #[arg(short, long)]
    pub verbose: bool,
}

/// `EnvFilter` directive used when `RUST_LOG` is unset.
/// `texfix` also matches `texfix_core` and `texfix_cli` targets.
pub fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "texfix=info"
    } else {
        "texfix=warn"
    }
}

/// Document the run operates on: `--input` wins over the config's `target`
pub fn resolve_input(args: &Args, config: &RewriteConfig) -> PathBuf {
    args.input.clone().unwrap_or_else(|| config.target.clone())
}

/// Execute one CLI invocation; `out` receives `--show-config` output
pub fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    let config = RewriteConfig::load(args.config.as_deref())?;
    if let Some(config_path) = &args.config {
        tracing::info!(path = %config_path.display(), "loaded config");
    }

    if args.show_config {
        write!(out, "{}", config.to_yaml()?)?;
        return Ok(());
    }

    let input = resolve_input(args, &config);

    // Stage dump mode: capture and save all intermediates
    if args.dump_stages {
        let rewriter = DocumentRewriter::new_dry_run(&config)?;
        let stages = rewriter.capture_stages(&input)?;
        save_stages(&stages, &args.stages_dir)?;
        tracing::info!(dir = %args.stages_dir.display(), "all stages dumped");
        return Ok(());
    }

    let rewriter = if args.dry_run {
        DocumentRewriter::new_dry_run(&config)?
    } else {
        DocumentRewriter::new(&config)?
    };

    let report = rewriter
        .rewrite_file(&input)
        .with_context(|| format!("rewrite of {} failed", input.display()))?;

    if let Some(report_path) = &args.report {
        save_report(&report, report_path)?;
    }

    Ok(())
}
