//! Interactive scoring CLI

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use toolbench::{
    config::Config,
    scoring::{listen_for_interrupt, ScoreError, Scorer, TerminalConsole},
};

#[derive(Parser)]
#[command(name = "toolbench-score")]
#[command(about = "Mark each with-tools and without-tools response correct or incorrect")]
#[command(version)]
struct Cli {
    /// Benchmark results file (one JSON record per line)
    file: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Usage errors exit with 1; help and version exit with 0
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let code = if e.use_stderr() { 1 } else { 0 };
        let _ = e.print();
        std::process::exit(code);
    });

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("toolbench=debug,warn")
        } else {
            EnvFilter::new("toolbench=warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = score(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn score(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Installed before loading so an early Ctrl+C is caught rather than fatal
    let interrupt = listen_for_interrupt()?;

    let config = Config::resolve(cli.config.as_deref())?;
    let mut scorer = Scorer::from_file(&cli.file, &config.scoring)?;
    let mut console = TerminalConsole::new(interrupt);

    match scorer.run(&mut console).await {
        Ok(path) => {
            println!("Now run: toolbench-visualize {}", path.display());
            Ok(())
        }
        Err(ScoreError::Interrupted) => {
            scorer.save()?;
            println!("\nSaved progress!");
            Ok(())
        }
        Err(ScoreError::InputClosed) => {
            scorer.save()?;
            println!("\nSaved progress to {}", scorer.output_path().display());
            Err(ScoreError::InputClosed.into())
        }
        Err(e) => Err(e.into()),
    }
}
