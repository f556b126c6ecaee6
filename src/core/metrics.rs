//! Metric identities and their polarity.
//!
//! Every numeric signal the engine ranks is named by a [`Metric`]. Whether a
//! high value is a problem is recorded once, in [`POLARITY_TABLE`], and read
//! by anything that needs to turn a rank into a verdict. Formulas never flip
//! signs on their own.

use super::signals::FileSignals;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Lines,
    CyclomaticComplexity,
    CognitiveComplexity,
    EfferentCoupling,
    AfferentCoupling,
    TestCoverage,
    Pagerank,
    BlastRadius,
    TotalChanges,
    BusFactor,
}

/// Which direction of a metric signals trouble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Polarity {
    HighBad,
    HighGood,
    /// Neither direction is a defect by itself (centrality, dependents).
    ContextDependent,
}

/// Expected shape of the metric across a codebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionShape {
    /// Right-skewed with a meaningful tail; fences are usable
    Lognormal,
    /// Heavy tail is the normal state; rank, never fence
    PowerLaw,
    /// Confined to a fixed interval
    Bounded,
}

pub const POLARITY_TABLE: [(Metric, Polarity); 10] = [
    (Metric::Lines, Polarity::HighBad),
    (Metric::CyclomaticComplexity, Polarity::HighBad),
    (Metric::CognitiveComplexity, Polarity::HighBad),
    (Metric::EfferentCoupling, Polarity::HighBad),
    (Metric::AfferentCoupling, Polarity::ContextDependent),
    (Metric::TestCoverage, Polarity::HighGood),
    (Metric::Pagerank, Polarity::ContextDependent),
    (Metric::BlastRadius, Polarity::ContextDependent),
    (Metric::TotalChanges, Polarity::HighBad),
    (Metric::BusFactor, Polarity::HighGood),
];

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::Lines,
        Metric::CyclomaticComplexity,
        Metric::CognitiveComplexity,
        Metric::EfferentCoupling,
        Metric::AfferentCoupling,
        Metric::TestCoverage,
        Metric::Pagerank,
        Metric::BlastRadius,
        Metric::TotalChanges,
        Metric::BusFactor,
    ];

    pub fn polarity(self) -> Polarity {
        POLARITY_TABLE
            .iter()
            .find(|(metric, _)| *metric == self)
            .map(|(_, polarity)| *polarity)
            .unwrap_or(Polarity::ContextDependent)
    }

    pub fn shape(self) -> DistributionShape {
        match self {
            Metric::Lines
            | Metric::CyclomaticComplexity
            | Metric::CognitiveComplexity
            | Metric::EfferentCoupling
            | Metric::AfferentCoupling => DistributionShape::Lognormal,
            Metric::Pagerank | Metric::BlastRadius | Metric::TotalChanges => {
                DistributionShape::PowerLaw
            }
            Metric::TestCoverage | Metric::BusFactor => DistributionShape::Bounded,
        }
    }

    /// Raw value for a file. Bus factor is derived, so it is passed in.
    pub fn raw_value(self, file: &FileSignals, bus_factor: f64) -> f64 {
        match self {
            Metric::Lines => file.lines as f64,
            Metric::CyclomaticComplexity => f64::from(file.cyclomatic_complexity),
            Metric::CognitiveComplexity => f64::from(file.cognitive_complexity),
            Metric::EfferentCoupling => f64::from(file.efferent_coupling),
            Metric::AfferentCoupling => f64::from(file.afferent_coupling),
            Metric::TestCoverage => file.test_coverage,
            Metric::Pagerank => file.pagerank,
            Metric::BlastRadius => file.blast_radius_size as f64,
            Metric::TotalChanges => f64::from(file.total_changes),
            Metric::BusFactor => bus_factor,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Lines => "lines",
            Metric::CyclomaticComplexity => "cyclomatic_complexity",
            Metric::CognitiveComplexity => "cognitive_complexity",
            Metric::EfferentCoupling => "efferent_coupling",
            Metric::AfferentCoupling => "afferent_coupling",
            Metric::TestCoverage => "test_coverage",
            Metric::Pagerank => "pagerank",
            Metric::BlastRadius => "blast_radius_size",
            Metric::TotalChanges => "total_changes",
            Metric::BusFactor => "bus_factor",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_table_covers_every_metric() {
        for metric in Metric::ALL {
            assert!(
                POLARITY_TABLE.iter().any(|(m, _)| *m == metric),
                "{metric} missing from polarity table"
            );
        }
    }

    #[test]
    fn test_ownership_and_coverage_are_high_good() {
        assert_eq!(Metric::BusFactor.polarity(), Polarity::HighGood);
        assert_eq!(Metric::TestCoverage.polarity(), Polarity::HighGood);
        assert_eq!(Metric::CyclomaticComplexity.polarity(), Polarity::HighBad);
        assert_eq!(Metric::Pagerank.polarity(), Polarity::ContextDependent);
    }

    #[test]
    fn test_change_counts_are_power_law() {
        assert_eq!(Metric::TotalChanges.shape(), DistributionShape::PowerLaw);
        assert_eq!(Metric::Lines.shape(), DistributionShape::Lognormal);
    }
}
