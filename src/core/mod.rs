//! Shared data model: signal records, metric identities, the per-run
//! snapshot and the findings detectors emit.

pub mod findings;
pub mod metrics;
pub mod signals;
pub mod snapshot;

pub use findings::{Evidence, Finding, FindingKind, PatternFinding, PatternKind, Severity};
pub use metrics::{DistributionShape, Metric, Polarity, POLARITY_TABLE};
pub use signals::{FileSignals, FileSignalsInput, SHARE_SUM_TOLERANCE};
pub use snapshot::{CodebaseSnapshot, FileProfile, SnapshotSummary, WindowScatter};
