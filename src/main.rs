use clap::Parser;
use countyq::{load_counties, Interpreter};
use std::path::PathBuf;
use tracing::debug;

/// Filter and aggregate county demographic data from an operations file
#[derive(Parser)]
#[command(name = "countyq")]
#[command(about = "Batch interpreter for county demographic data", long_about = None)]
struct Cli {
    /// Path to the operations file, one operation per line
    operations: PathBuf,

    /// Path to the county demographics JSON dataset
    #[arg(short, long, default_value = "data/county_demographics.json")]
    data: PathBuf,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let operations = std::fs::read_to_string(&cli.operations)
        .map_err(|_| anyhow::anyhow!("Unable to open file '{}'.", cli.operations.display()))?;
    debug!("read operations file {}", cli.operations.display());

    let counties = load_counties(&cli.data)?;
    println!("Loaded {} county entries.", counties.len());

    let stdout = std::io::stdout();
    let mut interpreter = Interpreter::new(counties, stdout.lock());
    interpreter.run(&operations)?;

    Ok(())
}
