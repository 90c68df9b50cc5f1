use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use generator::conf::ForwarderDocument;
use generator::output::{render_batch, render_metrics_exporter};
use generator::runtime::boot;

/// Render collector configuration for a forwarding document.
#[derive(Debug, Parser)]
#[command(name = "generator", version)]
struct Cli {
    /// Forwarding document (TOML, or JSON with a .json extension)
    document: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    boot::init_logging();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every output rendered.
fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = boot::boot()?;

    let document = ForwarderDocument::from_path(&cli.document)?;
    document.validate()?;
    info!("Loaded {} output(s) from {}", document.outputs.len(), cli.document.display());

    let report = render_batch(&document.requests(), &config.render_options(), &config.tls_profile());

    let mut rendered = report.config();
    if let Some(port) = config.metrics_port {
        rendered.push('\n');
        rendered.push_str(&render_metrics_exporter(config.collector, port));
    }
    print!("{}", rendered);

    if !report.is_ok() {
        error!("{} output(s) failed to render", report.failures().len());
    }
    Ok(report.is_ok())
}
