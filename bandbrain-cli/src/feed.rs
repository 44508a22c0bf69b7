//! Spot feed parsing.
//!
//! Reads newline-delimited JSON reception reports in the compact form the
//! common aggregator relays emit:
//!
//! ```text
//! {"sc":"K1ABC","rc":"JA1XYZ","f":14074950,"rp":-12,"t":1714070000.0,"rl":"PM95","sl":"FN42"}
//! ```
//!
//! The upstream timestamp `t` is carried for logging only. Freshness is
//! always measured from local receipt: relays batch and redeliver, and a
//! report that just arrived is tactically current no matter how long it
//! sat in a queue upstream.

use std::time::Instant;

use serde::Deserialize;

use bandbrain::model::{Callsign, Grid, Spot};

/// One reception report as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotRecord {
    /// Sender callsign.
    #[serde(rename = "sc")]
    pub sender: String,
    /// Receiver callsign.
    #[serde(rename = "rc")]
    pub receiver: String,
    /// Frequency in Hz. Either absolute RF or an audio offset, depending
    /// on the relay.
    #[serde(rename = "f")]
    pub freq_hz: u64,
    /// Signal report in dB.
    #[serde(rename = "rp")]
    pub snr_db: i16,
    /// Upstream timestamp, seconds since the epoch. Informational only.
    #[serde(rename = "t", default)]
    pub timestamp: Option<f64>,
    /// Receiver Maidenhead locator.
    #[serde(rename = "rl", default)]
    pub receiver_locator: Option<String>,
    /// Sender Maidenhead locator.
    #[serde(rename = "sl", default)]
    pub sender_locator: Option<String>,
}

impl SpotRecord {
    /// Parse one feed line.
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Convert to a [`Spot`] stamped with the local receipt time.
    ///
    /// Frequencies at or above `dial_hz` are absolute RF and reduce to an
    /// audio offset against the dial; smaller values are taken as offsets
    /// already. Returns `None` for records that cannot identify both
    /// stations.
    pub fn into_spot(self, dial_hz: u64, received_at: Instant) -> Option<Spot> {
        let sender = Callsign::new(&self.sender);
        let receiver = Callsign::new(&self.receiver);
        if sender.is_empty() || receiver.is_empty() {
            return None;
        }

        let offset_hz = if self.freq_hz >= dial_hz {
            u32::try_from(self.freq_hz - dial_hz).ok()?
        } else {
            u32::try_from(self.freq_hz).ok()?
        };

        Some(Spot {
            sender,
            receiver,
            sender_grid: self.sender_locator.as_deref().and_then(Grid::parse),
            receiver_grid: self.receiver_locator.as_deref().and_then(Grid::parse),
            offset_hz,
            snr_db: self.snr_db,
            received_at,
        })
    }
}
