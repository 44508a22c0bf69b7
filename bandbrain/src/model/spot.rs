//! Spot, local decode, and target context values.

use std::time::Instant;

use super::{Callsign, Grid};

/// One reception report: a claim that `receiver` decoded `sender` at a
/// given passband offset and SNR.
///
/// `received_at` is the *local receipt* instant, stamped when the report
/// arrived here. Freshness comparisons must use this field and never any
/// timestamp embedded in the upstream report — origin timestamps can be
/// minutes old by arrival and would make every spot look stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Spot {
    /// Station that transmitted the signal.
    pub sender: Callsign,
    /// Station that produced this reception report.
    pub receiver: Callsign,
    /// Sender's locator, if the report carried one.
    pub sender_grid: Option<Grid>,
    /// Receiver's locator, if the report carried one.
    pub receiver_grid: Option<Grid>,
    /// Signal position within the passband, in Hz.
    pub offset_hz: u32,
    /// Signal-to-noise estimate in dB.
    pub snr_db: i16,
    /// Local receipt instant.
    pub received_at: Instant,
}

impl Spot {
    /// Age of this spot at `now`.
    ///
    /// Saturates to zero if `received_at` is somehow in the future.
    pub fn age(&self, now: Instant) -> std::time::Duration {
        now.saturating_duration_since(self.received_at)
    }

    /// Identity key at the given frequency bucket width.
    pub fn key(&self, bucket_hz: u32) -> SpotKey {
        SpotKey::new(
            self.sender.clone(),
            self.receiver.clone(),
            self.offset_hz,
            bucket_hz,
        )
    }
}

/// Cache identity for a spot: sender, receiver, and coarse frequency
/// bucket. A newer report with the same key supersedes the old one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpotKey {
    /// Station that transmitted.
    pub sender: Callsign,
    /// Station that reported.
    pub receiver: Callsign,
    /// `offset_hz / bucket_hz` — small drift lands in the same bucket.
    pub bucket: u32,
}

impl SpotKey {
    /// Build a key, bucketing the offset at `bucket_hz` width.
    pub fn new(sender: Callsign, receiver: Callsign, offset_hz: u32, bucket_hz: u32) -> Self {
        let bucket = if bucket_hz == 0 {
            offset_hz
        } else {
            offset_hz / bucket_hz
        };
        Self {
            sender,
            receiver,
            bucket,
        }
    }
}

/// A decode produced by the operator's own receiver.
///
/// Held in a small short-lived buffer, never in the reception cache.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalDecode {
    /// Station we decoded.
    pub sender: Callsign,
    /// Passband offset of the signal, in Hz.
    pub offset_hz: u32,
    /// Signal-to-noise estimate in dB.
    pub snr_db: i16,
    /// Addressee of the decoded message, when the message was directed
    /// (e.g. the first call of a standard exchange).
    pub directed_to: Option<Callsign>,
    /// Local receipt instant.
    pub received_at: Instant,
}

impl LocalDecode {
    /// Age of this decode at `now`.
    pub fn age(&self, now: Instant) -> std::time::Duration {
        now.saturating_duration_since(self.received_at)
    }
}

/// The station the operator is currently trying to work.
///
/// Ephemeral, owned by the caller; the only input needed to compute a
/// perspective. `offset_hz` is the target's observed transmit offset,
/// refreshed from local decodes of the target as they arrive.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetContext {
    /// Target callsign.
    pub call: Callsign,
    /// Target locator, if known. Without it tiers 2–3 are ungradeable.
    pub grid: Option<Grid>,
    /// Target's observed transmit offset in Hz, if known.
    pub offset_hz: Option<u32>,
}

impl TargetContext {
    /// Create a target context with no observed offset yet.
    pub fn new(call: Callsign, grid: Option<Grid>) -> Self {
        Self {
            call,
            grid,
            offset_hz: None,
        }
    }
}
