//! Reading signal bundles and writing reports.

pub mod destinations;
pub mod input;
pub mod output;

pub use destinations::{FileDestination, MemoryDestination, OutputDestination, StdoutDestination};
pub use input::{parse_bundle, read_bundle, SignalBundle};
pub use output::{render_report, write_report, OutputFormat};
