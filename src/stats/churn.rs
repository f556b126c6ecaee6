//! Churn trajectory of a file's monthly change counts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trajectory {
    /// At most one change, or no variation at all
    Dormant,
    Stabilizing,
    Spiking,
    Churning,
    Stable,
}

impl Trajectory {
    /// Erratic change patterns worth flagging on a hotspot.
    pub fn is_unstable(self) -> bool {
        matches!(self, Self::Churning | Self::Spiking)
    }
}

/// Slope and volatility cut-offs for trajectory classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryThresholds {
    pub slope: f64,
    pub cv: f64,
}

impl Default for TrajectoryThresholds {
    fn default() -> Self {
        Self { slope: 0.1, cv: 0.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChurnProfile {
    pub total: u64,
    pub slope: f64,
    /// Population coefficient of variation (σ / mean)
    pub cv: f64,
    pub trajectory: Trajectory,
}

impl ChurnProfile {
    pub fn from_series(series: &[u32], thresholds: TrajectoryThresholds) -> Self {
        let total: u64 = series.iter().map(|&c| u64::from(c)).sum();
        let slope = linear_slope(series);
        let cv = coefficient_of_variation(series);
        Self {
            total,
            slope,
            cv,
            trajectory: classify(total, slope, cv, thresholds),
        }
    }
}

/// Ordinary least-squares slope against the window index.
pub fn linear_slope(series: &[u32]) -> f64 {
    let n = series.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = series.iter().map(|&v| f64::from(v)).sum::<f64>() / n as f64;

    let (numerator, denominator) = series.iter().enumerate().fold(
        (0.0, 0.0),
        |(num, den), (i, &v)| {
            let dx = i as f64 - x_mean;
            (num + dx * (f64::from(v) - y_mean), den + dx * dx)
        },
    );

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// 0 for fewer than two windows or an all-zero series.
pub fn coefficient_of_variation(series: &[u32]) -> f64 {
    let n = series.len();
    if n < 2 {
        return 0.0;
    }
    let mean = series.iter().map(|&v| f64::from(v)).sum::<f64>() / n as f64;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = series
        .iter()
        .map(|&v| (f64::from(v) - mean).powi(2))
        .sum::<f64>()
        / n as f64;
    variance.sqrt() / mean
}

fn classify(total: u64, slope: f64, cv: f64, thresholds: TrajectoryThresholds) -> Trajectory {
    if total <= 1 || cv == 0.0 {
        Trajectory::Dormant
    } else if slope < -thresholds.slope && cv < thresholds.cv {
        Trajectory::Stabilizing
    } else if slope > thresholds.slope && cv > thresholds.cv {
        Trajectory::Spiking
    } else if cv > thresholds.cv {
        Trajectory::Churning
    } else {
        Trajectory::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(series: &[u32]) -> ChurnProfile {
        ChurnProfile::from_series(series, TrajectoryThresholds::default())
    }

    #[test]
    fn test_empty_and_single_change_are_dormant() {
        assert_eq!(profile(&[]).trajectory, Trajectory::Dormant);
        assert_eq!(profile(&[0, 1, 0]).trajectory, Trajectory::Dormant);
    }

    #[test]
    fn test_constant_series_is_dormant() {
        let p = profile(&[4, 4, 4, 4]);
        assert_eq!(p.cv, 0.0);
        assert_eq!(p.slope, 0.0);
        assert_eq!(p.trajectory, Trajectory::Dormant);
    }

    #[test]
    fn test_rising_erratic_series_is_spiking() {
        let p = profile(&[0, 0, 1, 0, 9]);
        assert!(p.slope > 0.1);
        assert!(p.cv > 0.5);
        assert_eq!(p.trajectory, Trajectory::Spiking);
    }

    #[test]
    fn test_falling_steady_series_is_stabilizing() {
        let p = profile(&[6, 5, 5, 4, 4]);
        assert!(p.slope < -0.1);
        assert_eq!(p.trajectory, Trajectory::Stabilizing);
    }

    #[test]
    fn test_erratic_flat_series_is_churning() {
        let p = profile(&[8, 0, 8, 0, 8, 0]);
        assert!(p.slope.abs() <= 0.9);
        assert!(p.cv > 0.5);
        assert!(p.trajectory.is_unstable());
    }

    #[test]
    fn test_mild_variation_is_stable() {
        assert_eq!(profile(&[5, 6, 5, 6]).trajectory, Trajectory::Stable);
    }

    #[test]
    fn test_slope_of_linear_series() {
        assert!((linear_slope(&[1, 2, 3, 4]) - 1.0).abs() < 1e-12);
        assert_eq!(linear_slope(&[7]), 0.0);
    }
}
