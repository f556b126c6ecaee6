//! Distribution-free ranking and outlier detection.
//!
//! Code metrics are right-skewed (lognormal sizes and complexities,
//! power-law change counts), so nothing here assumes normality: no means,
//! no standard deviations, no z-scores. Ranks are empirical
//! (`|{v : v <= x}| / n`) and outliers come from Tukey fences on the
//! interquartile range.
//!
//! Degenerate inputs are handled locally. An empty distribution ranks every
//! value at 0; a distribution with no spread (IQR = 0) flags nothing and
//! reports that the caller should fall back to absolute thresholds.

use crate::core::metrics::DistributionShape;
use serde::Serialize;

/// Multiplier for the inner (moderate) fences.
pub const MODERATE_FENCE: f64 = 1.5;
/// Multiplier for the outer (extreme) fences.
pub const EXTREME_FENCE: f64 = 3.0;
/// Below this many distinct values fences are not trusted.
pub const MIN_DISTINCT_FOR_FENCES: usize = 15;

/// Fraction of `sorted` that is `<= value`, in [0, 1].
///
/// `sorted` must be ascending. Returns 0 for an empty slice.
pub fn percentile_rank(value: f64, sorted: &[f64]) -> f64 {
    if sorted.is_empty() || value.is_nan() {
        return 0.0;
    }
    let at_or_below = sorted.partition_point(|&v| v <= value);
    at_or_below as f64 / sorted.len() as f64
}

/// Linear-interpolated quantile of an ascending slice, `q` in [0, 1].
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q3: f64,
}

impl Quartiles {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Tukey fences. With IQR = 0 every fence collapses onto `[q1, q3]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierFences {
    pub lower: f64,
    pub upper: f64,
    pub extreme_lower: f64,
    pub extreme_upper: f64,
}

impl OutlierFences {
    pub fn from_quartiles(quartiles: Quartiles) -> Self {
        let iqr = quartiles.iqr();
        Self {
            lower: quartiles.q1 - MODERATE_FENCE * iqr,
            upper: quartiles.q3 + MODERATE_FENCE * iqr,
            extreme_lower: quartiles.q1 - EXTREME_FENCE * iqr,
            extreme_upper: quartiles.q3 + EXTREME_FENCE * iqr,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.upper <= self.lower
    }
}

/// Why fence-based flagging was not used for a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    Empty,
    ZeroSpread,
    FewDistinctValues,
    PowerLawShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "method", content = "reason", rename_all = "snake_case")]
pub enum OutlierMethod {
    IqrFences,
    /// Caller should consult absolute thresholds for this metric instead.
    Fallback(FallbackReason),
}

/// Indices (into the input slice) of values outside the fences.
///
/// The two sets are disjoint: `moderate` holds values outside the inner
/// fences but inside the outer ones, `extreme` holds values beyond the outer
/// fences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierReport {
    pub moderate: Vec<usize>,
    pub extreme: Vec<usize>,
    pub method: OutlierMethod,
}

impl OutlierReport {
    fn fallback(reason: FallbackReason) -> Self {
        Self {
            moderate: Vec::new(),
            extreme: Vec::new(),
            method: OutlierMethod::Fallback(reason),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.moderate.is_empty() && self.extreme.is_empty()
    }

    pub fn used_fences(&self) -> bool {
        self.method == OutlierMethod::IqrFences
    }
}

/// Fence-based classification of raw values (any order).
///
/// Never panics. Empty input or zero spread yields an empty report marked
/// as a fallback.
pub fn classify_outliers(values: &[f64]) -> OutlierReport {
    let distribution = Distribution::new(values.iter().copied());
    let Some(fences) = distribution.outlier_fences() else {
        return OutlierReport::fallback(FallbackReason::Empty);
    };
    if fences.is_degenerate() {
        return OutlierReport::fallback(FallbackReason::ZeroSpread);
    }

    let mut moderate = Vec::new();
    let mut extreme = Vec::new();
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            continue;
        }
        if value < fences.extreme_lower || value > fences.extreme_upper {
            extreme.push(index);
        } else if value < fences.lower || value > fences.upper {
            moderate.push(index);
        }
    }

    OutlierReport {
        moderate,
        extreme,
        method: OutlierMethod::IqrFences,
    }
}

/// Like [`classify_outliers`], but declines to use fences where they would
/// mislead: too few distinct values, or a heavy tail that is the expected
/// shape of the metric.
pub fn classify_outliers_for_shape(values: &[f64], shape: DistributionShape) -> OutlierReport {
    if shape == DistributionShape::PowerLaw {
        return OutlierReport::fallback(FallbackReason::PowerLawShape);
    }
    let distribution = Distribution::new(values.iter().copied());
    if distribution.is_empty() {
        return OutlierReport::fallback(FallbackReason::Empty);
    }
    if distribution.distinct_count() < MIN_DISTINCT_FOR_FENCES {
        return OutlierReport::fallback(FallbackReason::FewDistinctValues);
    }
    classify_outliers(values)
}

/// An ascending, finite-only copy of a metric's values across a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distribution {
    sorted: Vec<f64>,
}

impl Distribution {
    pub const fn empty() -> Self {
        Self { sorted: Vec::new() }
    }

    /// Non-finite values are dropped.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        Self { sorted }
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.sorted
    }

    pub fn percentile_rank(&self, value: f64) -> f64 {
        percentile_rank(value, &self.sorted)
    }

    pub fn quantile(&self, q: f64) -> Option<f64> {
        quantile(&self.sorted, q)
    }

    pub fn median(&self) -> Option<f64> {
        self.quantile(0.5)
    }

    pub fn max(&self) -> Option<f64> {
        self.sorted.last().copied()
    }

    pub fn quartiles(&self) -> Option<Quartiles> {
        Some(Quartiles {
            q1: self.quantile(0.25)?,
            q3: self.quantile(0.75)?,
        })
    }

    pub fn iqr(&self) -> Option<f64> {
        self.quartiles().map(|q| q.iqr())
    }

    pub fn outlier_fences(&self) -> Option<OutlierFences> {
        self.quartiles().map(OutlierFences::from_quartiles)
    }

    pub fn distinct_count(&self) -> usize {
        let mut count = 0;
        let mut previous: Option<f64> = None;
        for &value in &self.sorted {
            if previous != Some(value) {
                count += 1;
                previous = Some(value);
            }
        }
        count
    }
}
