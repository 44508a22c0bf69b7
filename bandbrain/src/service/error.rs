//! Service error types.

use thiserror::Error;

/// Errors surfaced by the service facade.
///
/// Runtime degradation (a poisoned lock, an empty perspective) is handled
/// inside the components and never reaches here; these are caller errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BrainError {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A callsign that cannot identify a station.
    #[error("invalid callsign: {0:?}")]
    InvalidCallsign(String),

    /// A tactical query was made with no target selected.
    #[error("no target selected")]
    NoTarget,
}
