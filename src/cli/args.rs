use crate::config::OutputLayout;
use crate::utils::constants::DEFAULT_COMBINED_FILE;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bikeshare-processor")]
#[command(about = "Prepare bike-share trip history and hourly weather for analysis")]
#[command(version)]
pub struct Cli {
    // Defaults to `process` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub inputs: InputArgs,

    #[arg(short, long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide progress spinners and the summary")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    #[arg(short, long, global = true, help = "Data folder path")]
    pub data_folder: Option<PathBuf>,

    #[arg(short, long, global = true, help = "CSV file name for rentals")]
    pub rentals: Option<String>,

    #[arg(short, long, global = true, help = "CSV file name for weather")]
    pub weather: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Derive the five output tables from the trip and weather files
    Process {
        #[arg(short, long, help = "Directory for the output tables [default: data]")]
        output_dir: Option<PathBuf>,

        #[arg(long, value_enum, help = "Set of tables to produce [default: normalized]")]
        layout: Option<OutputLayout>,
    },

    /// Check that the input files carry their expected columns
    Validate,

    /// Concatenate monthly trip-history files into one file
    Combine {
        #[arg(required = true, num_args = 1.., help = "Monthly trip files, in order")]
        inputs: Vec<PathBuf>,

        #[arg(short, long, default_value = DEFAULT_COMBINED_FILE)]
        output: PathBuf,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Process {
            output_dir: None,
            layout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_invocation_processes_with_defaults() {
        let cli = Cli::try_parse_from(["bikeshare-processor"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.inputs.data_folder.is_none());
    }

    #[test]
    fn test_input_flags_before_or_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bikeshare-processor",
            "-d",
            "/srv/data",
            "process",
            "-w",
            "weather_2022.csv",
            "--layout",
            "legacy",
        ])
        .unwrap();

        assert_eq!(cli.inputs.data_folder, Some(PathBuf::from("/srv/data")));
        assert_eq!(cli.inputs.weather.as_deref(), Some("weather_2022.csv"));
        match cli.command {
            Some(Commands::Process { layout, .. }) => assert_eq!(layout, Some(OutputLayout::Legacy)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_combine_requires_inputs() {
        assert!(Cli::try_parse_from(["bikeshare-processor", "combine"]).is_err());

        let cli = Cli::try_parse_from(["bikeshare-processor", "combine", "a.csv", "b.csv"]).unwrap();
        match cli.command {
            Some(Commands::Combine { inputs, output }) => {
                assert_eq!(inputs.len(), 2);
                assert_eq!(output, PathBuf::from(DEFAULT_COMBINED_FILE));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
