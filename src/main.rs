use anyhow::Context;
use roundtrip::{config::Config, pipeline};

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&config) {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let report = pipeline::run(config)
        .with_context(|| format!("Failed to process {}", config.ledger_path.display()))?;

    println!(
        "{} closed positions from {} executions ({} symbols left open) -> {}",
        report.stats.closed,
        report.stats.executions,
        report.stats.unclosed_symbols,
        report.output_path.display()
    );
    Ok(())
}
