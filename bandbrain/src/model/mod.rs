//! Core value types shared across the cache and analysis engines.
//!
//! Everything here is validated at the ingest boundary: the cache and the
//! engines never see a malformed callsign or locator. Spots are immutable
//! once constructed; an update is a new spot that supersedes the old one by
//! recency.

mod callsign;
mod grid;
mod spot;

pub use callsign::Callsign;
pub use grid::Grid;
pub use spot::{LocalDecode, Spot, SpotKey, TargetContext};
