//! Cross-dimensional mismatch detection.
//!
//! Three checks compare dimensions that should agree:
//!
//! - structure vs. change history, per file ([`alignment`]),
//! - co-change vs. structural or module coupling, per pair ([`coupling`]),
//! - code distance vs. coordination distance, per pair ([`congruence`]).
//!
//! Pair checks read only the two files involved plus external pair data, so
//! they run independently of each other.

pub mod alignment;
pub mod congruence;
pub mod coupling;
pub mod pairs;

pub use alignment::{assess_alignment, classify_alignment, Alignment, AlignmentDetector, AlignmentReading};
pub use congruence::{classify_congruence, Congruence};
pub use coupling::{is_hidden_coupling, share_module};
pub use pairs::{assess_pair, CouplingOracle, PairAssessment, PairRecord, PairTables};
