//! Configuration for scoring runs, read from `.riskmap.toml`.

mod core;
mod detection;
mod loader;
mod scoring;
mod thresholds;
pub mod validation;

pub use core::{FocusConfig, PatternsConfig, RiskmapConfig};
pub use detection::DetectorsConfig;
pub use loader::{
    default_config_toml, directory_ancestors, discover_config, load_config, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use scoring::{ActionabilityConfig, HotspotConfig, RiskWeights, ScoringConfig};
pub use thresholds::{AbsoluteThresholds, PercentileFloors, ThresholdsConfig, TrajectoryConfig};
pub use validation::{validate_config, validate_config_result};
