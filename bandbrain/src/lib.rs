//! BandBrain - tactical awareness core for FT8 operation
//!
//! This library ingests reception reports and local decodes in real time
//! and answers the questions that matter mid-QSO: what does the target
//! station's region hear right now, how many others are calling it, has
//! it heard us, and where in the passband should we transmit.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use bandbrain::model::{Callsign, Grid, TargetContext};
//! use bandbrain::service::{BandBrainService, BrainConfig};
//!
//! let config = BrainConfig::new("WU2C")?;
//! let service = BandBrainService::new(config)?;
//!
//! service.set_target(TargetContext::new(Callsign::new("JA1XYZ"), Grid::parse("PM95")));
//! let assessment = service.assess(std::time::Instant::now())?;
//! ```

pub mod cache;
pub mod competition;
pub mod logging;
pub mod model;
pub mod perspective;
pub mod recommend;
pub mod service;

/// Version of the BandBrain library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_injected() {
        assert!(!VERSION.is_empty());
    }
}
