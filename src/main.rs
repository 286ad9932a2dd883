use anyhow::Context;
use clap::Parser;
use squeeze_originals::batch::{run_batch, BatchConfig};
use squeeze_originals::cli::Args;
use squeeze_originals::logger::{set_verbosity, Verbosity};
use squeeze_originals::{error, verbose};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    set_verbosity(Verbosity::from_flags(args.quiet, args.verbose));

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let project_root = match &args.project_root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to resolve the current directory")?,
    };

    let config = BatchConfig::for_project(&project_root, args.jobs);
    verbose!("Project root: {}", project_root.display());
    verbose!("Concurrency: {}", config.concurrency);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    runtime.block_on(run_batch(&config))?;
    Ok(())
}
