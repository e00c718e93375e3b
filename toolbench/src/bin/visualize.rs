//! Statistics and chart CLI

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use toolbench::{
    analysis::ComparisonReport,
    config::Config,
    records::{self, Verdict},
    reporting::{print_console_report, ChartEmitter, JsonSummary},
};

#[derive(Parser)]
#[command(name = "toolbench-visualize")]
#[command(about = "Summarize a benchmark results file and render comparison charts")]
#[command(version)]
struct Cli {
    /// Benchmark results file (one JSON record per line)
    file: PathBuf,

    /// Directory for rendered charts [default: output]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
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

    if let Err(e) = visualize(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn visualize(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::resolve(cli.config.as_deref())?;
    let output_dir = cli
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&config.output.default_dir));

    let mut records = records::load_records(&cli.file)?;
    let report = ComparisonReport::from_records(&records);

    let emitter = ChartEmitter::new(config.charts.clone());
    let charts = emitter.emit(&records, &report, &output_dir)?;
    tracing::info!("Rendered {} charts", charts.len());

    print_console_report(&report);

    if config.output.write_summary {
        let summary = JsonSummary::new(&cli.file, &charts, &report);
        summary.write_to_file(output_dir.join("summary.json"))?;
    }

    // Give unscored files explicit null verdicts so they are ready for scoring
    if !report.has_correctness_data() {
        for record in &mut records {
            record.with_tools_correct = Verdict::Unset;
            record.without_tools_correct = Verdict::Unset;
        }
        let bootstrap = records::correctness_path(&cli.file);
        records::save_records(&bootstrap, &records)?;
        tracing::info!("Wrote {}", bootstrap.display());
    }

    println!("Charts: {}/", output_dir.display());
    Ok(())
}
