//! kolosal-viz - Main Entry Point
//!
//! Renders charts of labeled CSV datasets from the command line.

use clap::Parser;
use kolosal_viz::cli::{cmd_charts, cmd_info, cmd_plot, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kolosal_viz=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plot { data, label, chart, dimensions, output, config, format } => {
            cmd_plot(
                &data,
                &label,
                &chart,
                dimensions,
                output.as_deref(),
                config.as_deref(),
                format,
            )?;
        }
        Commands::Charts => {
            cmd_charts()?;
        }
        Commands::Info { data, label } => {
            cmd_info(&data, label.as_deref())?;
        }
    }

    Ok(())
}
