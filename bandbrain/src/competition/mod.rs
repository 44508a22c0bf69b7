//! Competition and path analysis.
//!
//! Derives pileup density around the target's frequency and a
//! classification of whether the operator's own signal has been reported
//! near the target's region.

mod analyzer;
mod path;

pub use analyzer::{Competition, CompetitionAnalyzer, CompetitionConfig, CompetitionLevel};
pub use path::{PathAnalyzer, PathStatus};
