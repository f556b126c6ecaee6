use crate::io::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "riskmap")]
#[command(about = "Risk and actionability scoring for code-health signals", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a signal bundle and write the analysis report
    Score {
        /// JSON signal bundle (files, pairs, architecture)
        input: PathBuf,

        /// Configuration file (defaults to discovering .riskmap.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of alternatives listed after the focus point
        #[arg(long)]
        alternatives: Option<usize>,

        /// Worker threads for per-file scoring (0 = all cores)
        #[arg(short, long, default_value = "0")]
        jobs: usize,
    },

    /// Write a default .riskmap.toml to the current directory
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
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
    fn test_score_defaults() {
        let cli = Cli::try_parse_from(["riskmap", "score", "bundle.json"]).unwrap();
        match cli.command {
            Commands::Score {
                input,
                config,
                format,
                output,
                alternatives,
                jobs,
            } => {
                assert_eq!(input, PathBuf::from("bundle.json"));
                assert!(config.is_none());
                assert_eq!(format, OutputFormat::Json);
                assert!(output.is_none());
                assert!(alternatives.is_none());
                assert_eq!(jobs, 0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_score_flags() {
        let cli = Cli::try_parse_from([
            "riskmap",
            "score",
            "in.json",
            "--format",
            "yaml",
            "--alternatives",
            "3",
            "-j",
            "4",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Score {
                format: OutputFormat::Yaml,
                alternatives: Some(3),
                jobs: 4,
                ..
            }
        ));
    }
}
