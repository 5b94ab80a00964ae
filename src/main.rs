use anyhow::Result;
use clap::Parser;
use cribar::{cli::Cli, report};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = match &args.config {
        Some(path) => report::ReportConfig::from_file(path)?,
        None => report::ReportConfig::default(),
    };

    report::run_report(args.report, &args.input, &args.output_dir, &config)?;

    Ok(())
}
