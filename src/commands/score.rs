use crate::builders::{AnalysisReport, AnalysisRun};
use crate::config::{load_config, load_config_from, RiskmapConfig};
use crate::errors::Result;
use crate::io::{
    read_bundle, write_report, FileDestination, OutputDestination, OutputFormat,
    StdoutDestination,
};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ScoreConfig {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub alternatives: Option<usize>,
    pub jobs: usize,
}

/// Explicit path first, otherwise discovery from the working directory.
fn resolve_config(score: &ScoreConfig) -> Result<RiskmapConfig> {
    let mut config = match &score.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    if let Some(alternatives) = score.alternatives {
        config.focus.alternatives = alternatives;
    }
    Ok(config)
}

pub fn score_bundle(score: &ScoreConfig) -> Result<AnalysisReport> {
    let config = resolve_config(score)?;
    let bundle = read_bundle(&score.input)?;
    AnalysisRun::new(config)
        .with_jobs(Some(score.jobs))
        .run(bundle)
}

pub fn run_score(score: ScoreConfig) -> Result<()> {
    let report = score_bundle(&score)?;
    let destination: Box<dyn OutputDestination> = match &score.output {
        Some(path) => Box::new(FileDestination::new(path.clone())),
        None => Box::new(StdoutDestination),
    };
    write_report(&report, score.format, destination.as_ref())
}
