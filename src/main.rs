use anyhow::Result;
use clap::Parser;
use riskmap::cli::{Cli, Commands};
use riskmap::commands::{init_config, run_score, ScoreConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            input,
            config,
            format,
            output,
            alternatives,
            jobs,
        } => run_score(ScoreConfig {
            input,
            config,
            format,
            output,
            alternatives,
            jobs,
        })?,
        Commands::Init { force } => {
            let path = init_config(&std::env::current_dir()?, force)?;
            eprintln!("Created {}", path.display());
        }
    }
    Ok(())
}
