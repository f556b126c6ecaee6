//! Shannon entropy over categorical distributions.
//!
//! Used twice: author line shares give a file's bus factor, and per-file
//! change counts inside one time window give that window's change scatter.

use serde::{Deserialize, Serialize};

/// Shannon entropy in bits, summing only over strictly positive proportions.
///
/// Proportions are taken as given; callers normalise first when needed.
/// A single category (or no categories at all) yields exactly 0.
pub fn shannon_entropy<I>(proportions: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let entropy: f64 = proportions
        .into_iter()
        .filter(|p| p.is_finite() && *p > 0.0)
        .map(|p| -p * p.log2())
        .sum();
    // -0.0 and tiny negatives from rounding on a single category
    entropy.max(0.0)
}

/// Entropy of raw counts, normalised by their total.
pub fn entropy_of_counts<I>(counts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let counts: Vec<f64> = counts.into_iter().filter(|c| *c > 0.0).collect();
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    shannon_entropy(counts.iter().map(|c| c / total))
}

/// Effective number of owners, `2^entropy`. At least 1.
pub fn bus_factor(author_entropy: f64) -> f64 {
    2f64.powf(author_entropy.max(0.0))
}

/// Ownership health in [0, 1], saturating once the bus factor reaches 5.
pub fn bus_factor_health(bus_factor: f64) -> f64 {
    ((bus_factor - 1.0) / 4.0).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnershipBand {
    /// Effectively one owner
    Critical,
    HighRisk,
    Moderate,
    Healthy,
}

impl OwnershipBand {
    /// Bands are read off the reported (floored) bus factor for the single
    /// owner case, and off the raw value otherwise.
    pub fn from_bus_factor(bus_factor: f64) -> Self {
        if bus_factor.floor() <= 1.0 {
            Self::Critical
        } else if bus_factor < 3.0 {
            Self::HighRisk
        } else if bus_factor >= 5.0 {
            Self::Healthy
        } else {
            Self::Moderate
        }
    }
}

/// Derived ownership for one file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ownership {
    pub entropy: f64,
    pub bus_factor: f64,
    /// `bus_factor` rounded down, for display
    pub reported_bus_factor: u32,
    pub band: OwnershipBand,
    pub health: f64,
}

impl Ownership {
    pub fn from_shares<I>(shares: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let entropy = shannon_entropy(shares);
        let bus_factor = bus_factor(entropy);
        Self {
            entropy,
            bus_factor,
            reported_bus_factor: bus_factor.floor() as u32,
            band: OwnershipBand::from_bus_factor(bus_factor),
            health: bus_factor_health(bus_factor),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScatterBand {
    Focused,
    Moderate,
    HighScatter,
}

/// How widely one window's changes spread across the files touched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChangeScatter {
    pub entropy: f64,
    pub max_entropy: f64,
    /// `entropy / max_entropy`, 0 when only one file changed
    pub ratio: f64,
    pub band: ScatterBand,
}

impl ChangeScatter {
    pub const HIGH_RATIO: f64 = 0.8;
    pub const FOCUSED_RATIO: f64 = 0.3;

    /// `counts` are per-file change counts within one window; zero counts
    /// are ignored. `file_count` is the number of files the comparison is
    /// made against.
    pub fn from_counts(counts: &[f64], file_count: usize) -> Self {
        let entropy = entropy_of_counts(counts.iter().copied());
        let max_entropy = if file_count > 1 {
            (file_count as f64).log2()
        } else {
            0.0
        };
        let ratio = if max_entropy > 0.0 {
            (entropy / max_entropy).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let band = if ratio > Self::HIGH_RATIO {
            ScatterBand::HighScatter
        } else if ratio < Self::FOCUSED_RATIO {
            ScatterBand::Focused
        } else {
            ScatterBand::Moderate
        };
        Self {
            entropy,
            max_entropy,
            ratio,
            band,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_author_is_critical() {
        let ownership = Ownership::from_shares([1.0]);
        assert_eq!(ownership.entropy, 0.0);
        assert_eq!(ownership.bus_factor, 1.0);
        assert_eq!(ownership.band, OwnershipBand::Critical);
        assert_eq!(ownership.health, 0.0);
    }

    #[test]
    fn test_even_split_between_two_authors() {
        let ownership = Ownership::from_shares([0.5, 0.5]);
        assert!((ownership.entropy - 1.0).abs() < 1e-12);
        assert!((ownership.bus_factor - 2.0).abs() < 1e-12);
        assert_eq!(ownership.reported_bus_factor, 2);
        assert_eq!(ownership.band, OwnershipBand::HighRisk);
        assert!((ownership.health - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_dominant_author_still_reports_critical() {
        // 2^H ≈ 1.38, floors to one effective owner
        let ownership = Ownership::from_shares([0.9, 0.1]);
        assert_eq!(ownership.reported_bus_factor, 1);
        assert_eq!(ownership.band, OwnershipBand::Critical);
        assert!(ownership.health > 0.0);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(OwnershipBand::from_bus_factor(3.0), OwnershipBand::Moderate);
        assert_eq!(OwnershipBand::from_bus_factor(4.99), OwnershipBand::Moderate);
        assert_eq!(OwnershipBand::from_bus_factor(5.0), OwnershipBand::Healthy);
        assert_eq!(OwnershipBand::from_bus_factor(2.5), OwnershipBand::HighRisk);
        assert_eq!(bus_factor_health(9.0), 1.0);
    }

    #[test]
    fn test_zero_shares_ignored() {
        assert_eq!(shannon_entropy([1.0, 0.0, 0.0]), 0.0);
        assert_eq!(shannon_entropy(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_change_scatter_bands() {
        let even = ChangeScatter::from_counts(&[3.0, 3.0, 3.0, 3.0], 4);
        assert!((even.ratio - 1.0).abs() < 1e-12);
        assert_eq!(even.band, ScatterBand::HighScatter);

        let focused = ChangeScatter::from_counts(&[40.0, 1.0], 16);
        assert_eq!(focused.band, ScatterBand::Focused);

        let lonely = ChangeScatter::from_counts(&[5.0], 1);
        assert_eq!(lonely.ratio, 0.0);
        assert_eq!(lonely.band, ScatterBand::Focused);
    }

    proptest! {
        #[test]
        fn prop_entropy_within_log2_of_categories(
            weights in prop::collection::vec(0.0f64..10.0, 1..20),
        ) {
            let entropy = entropy_of_counts(weights.iter().copied());
            let categories = weights.iter().filter(|w| **w > 0.0).count().max(1);
            prop_assert!(entropy >= 0.0);
            prop_assert!(entropy <= (categories as f64).log2() + 1e-9);
            prop_assert!(bus_factor(entropy) >= 1.0);
        }
    }
}
