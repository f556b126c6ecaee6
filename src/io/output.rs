//! Report serialization.
//!
//! Reports are structured data only. Turning them into prose for people is
//! left to whatever consumes them.

use super::destinations::OutputDestination;
use crate::builders::AnalysisReport;
use crate::errors::{Error, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

pub fn render_report(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(report).map_err(|e| e.to_string()),
    };
    rendered.map_err(|message| Error::parse("<report>", message))
}

pub fn write_report(
    report: &AnalysisReport,
    format: OutputFormat,
    destination: &dyn OutputDestination,
) -> Result<()> {
    let rendered = render_report(report, format)?;
    destination.write_str(&rendered)?;
    destination.flush()?;
    log::debug!(
        "Wrote {:?} report ({} bytes) to {}",
        format,
        rendered.len(),
        destination.description()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::AnalysisRun;
    use crate::config::RiskmapConfig;
    use crate::core::{FileSignals, FileSignalsInput};
    use crate::io::{MemoryDestination, SignalBundle};

    fn report() -> AnalysisReport {
        let files = (0..4)
            .map(|i| {
                let mut s = FileSignals::new(format!("src/f{i}.rs"));
                s.total_changes = i * 3;
                if i > 0 {
                    s.author_line_shares.insert("ana".to_string(), 1.0);
                }
                FileSignalsInput::from(s)
            })
            .collect();
        AnalysisRun::new(RiskmapConfig::default())
            .run(SignalBundle {
                files,
                ..SignalBundle::default()
            })
            .unwrap()
    }

    #[test]
    fn test_json_report_is_structured() {
        let report = report();
        let dest = MemoryDestination::new();
        write_report(&report, OutputFormat::Json, &dest).unwrap();
        let value: serde_json::Value = serde_json::from_str(&dest.get_content()).unwrap();
        assert_eq!(value["summary"]["file_count"], 4);
        assert_eq!(value["summary"]["strategy"], "ABSOLUTE");
        assert_eq!(value["ranked"].as_array().unwrap().len(), 4);
        assert!(value["focus"]["verdict"].is_string());
    }

    #[test]
    fn test_yaml_report_renders() {
        let rendered = render_report(&report(), OutputFormat::Yaml).unwrap();
        assert!(rendered.contains("summary:"));
        assert!(rendered.contains("ranked:"));
    }
}
