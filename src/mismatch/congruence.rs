//! Socio-technical congruence: does the way people coordinate match the
//! way the code is connected?

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Congruence {
    Aligned,
    /// Far apart in code, yet coordinated closely
    CoordinationOverhead,
    /// Tightly connected in code, yet nobody coordinates on them
    MissingCoordination,
}

/// Classify a pair from its technical and coordination distances.
///
/// A missing distance means the two files are unreachable from each other
/// in that graph and is treated as infinitely far.
pub fn classify_congruence(
    technical: Option<f64>,
    coordination: Option<f64>,
    far: f64,
    near: f64,
) -> Congruence {
    let technical = technical.unwrap_or(f64::INFINITY);
    let coordination = coordination.unwrap_or(f64::INFINITY);
    if technical > far && coordination < near {
        Congruence::CoordinationOverhead
    } else if technical < near && coordination > far {
        Congruence::MissingCoordination
    } else {
        Congruence::Aligned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_far_code_close_people_is_overhead() {
        assert_eq!(
            classify_congruence(Some(5.0), Some(1.0), 3.0, 2.0),
            Congruence::CoordinationOverhead
        );
    }

    #[test]
    fn test_close_code_far_people_is_missing() {
        assert_eq!(
            classify_congruence(Some(1.0), Some(4.0), 3.0, 2.0),
            Congruence::MissingCoordination
        );
        assert_eq!(
            classify_congruence(Some(1.0), None, 3.0, 2.0),
            Congruence::MissingCoordination
        );
    }

    #[test]
    fn test_boundaries_are_aligned() {
        assert_eq!(
            classify_congruence(Some(3.0), Some(1.0), 3.0, 2.0),
            Congruence::Aligned
        );
        assert_eq!(
            classify_congruence(Some(2.0), Some(5.0), 3.0, 2.0),
            Congruence::Aligned
        );
        assert_eq!(classify_congruence(None, None, 3.0, 2.0), Congruence::Aligned);
    }
}
