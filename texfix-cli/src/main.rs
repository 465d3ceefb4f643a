use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

// Import CLI utilities
use texfix_cli::{default_log_filter, run, Args};

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    run(&args, &mut std::io::stdout().lock())
}
