//! Clamped unit-interval score.
//!
//! Every sub-score of `actionability` lives in [0, 1]. Encoding that in a
//! type means a product of sub-scores can never leave the interval, and a
//! stray NaN collapses to 0 instead of poisoning a ranking.
//!
//! ```rust
//! use riskmap::priority::score_types::Score0To1;
//!
//! let risk = Score0To1::new(0.8);
//! let impact = Score0To1::new(1.7);
//! assert_eq!(impact.value(), 1.0);
//! assert_eq!((risk * impact).value(), 0.8);
//! assert_eq!(Score0To1::new(f64::NAN), Score0To1::ZERO);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Mul;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score0To1(f64);

impl Score0To1 {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);

    /// Clamp into [0.0, 1.0]; NaN becomes 0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self::ZERO
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// Scale by a discount factor, staying in range.
    pub fn discounted(self, factor: f64) -> Self {
        Self::new(self.0 * factor)
    }
}

impl Mul for Score0To1 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.0 * rhs.0)
    }
}

impl From<Score0To1> for f64 {
    fn from(score: Score0To1) -> f64 {
        score.0
    }
}

impl std::fmt::Display for Score0To1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
