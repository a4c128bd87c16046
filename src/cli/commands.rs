use crate::cli::args::{Cli, Commands};
use crate::config::{ConfigOverrides, OutputLayout, PipelineConfig};
use crate::pipeline::Pipeline;
use crate::processors::TripCombiner;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command.clone().unwrap_or_default() {
        Commands::Process { output_dir, layout } => {
            let config = load_config(&cli, output_dir, layout)?;
            info!("Rentals file: {}", config.rentals_path().display());
            info!("Weather file: {}", config.weather_path().display());
            info!(
                "Output directory: {} ({:?} layout)",
                config.output_dir.display(),
                config.layout
            );

            let outcome = Pipeline::new(config)
                .with_silent(cli.quiet)
                .run()
                .context("Processing failed")?;

            if !cli.quiet {
                println!("\n{}", outcome.report.summary());
            }
            info!("Processing complete");
        }

        Commands::Validate => {
            let config = load_config(&cli, None, None)?;
            let columns = Pipeline::new(config)
                .with_silent(cli.quiet)
                .check()
                .context("Validation failed")?;

            if !cli.quiet {
                println!(
                    "Trip columns: {}, weather columns: {}",
                    if columns.trips { "ok" } else { "missing" },
                    if columns.weather { "ok" } else { "missing" }
                );
            }
        }

        Commands::Combine { inputs, output } => {
            let config = load_config(&cli, None, None)?;
            let delimiter = config
                .trip_source
                .delimiter_byte()
                .context("Invalid trip delimiter")?;

            let rows = TripCombiner::with_delimiter(delimiter)
                .combine(&inputs, &output)
                .with_context(|| format!("Failed to combine into {}", output.display()))?;

            if !cli.quiet {
                println!("Combined {} files into {} ({} rows)", inputs.len(), output.display(), rows);
            }
        }
    }

    Ok(())
}

fn load_config(
    cli: &Cli,
    output_dir: Option<PathBuf>,
    layout: Option<OutputLayout>,
) -> Result<PipelineConfig> {
    let overrides = ConfigOverrides {
        data_folder: cli.inputs.data_folder.clone(),
        rentals_file: cli.inputs.rentals.clone(),
        weather_file: cli.inputs.weather.clone(),
        output_dir,
        layout,
    };

    let config = PipelineConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(overrides)
        .context("Invalid configuration")?;

    Ok(config)
}
