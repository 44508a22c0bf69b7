//! Short-lived buffer for the operator's own decodes.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::error;

use crate::model::{Callsign, LocalDecode};

/// Buffer of recent [`LocalDecode`] values.
///
/// Deliberately separate from the reception cache: local decodes are not
/// reception reports and only feed the recommendation engine and the
/// path-status local-evidence check. The same prune pass that sweeps the
/// cache sweeps this buffer.
pub struct LocalDecodeBuffer {
    inner: Mutex<Vec<LocalDecode>>,
}

impl LocalDecodeBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
        }
    }

    /// Record a decode.
    pub fn insert(&self, decode: LocalDecode) {
        match self.inner.lock() {
            Ok(mut decodes) => decodes.push(decode),
            Err(e) => error!(error = %e, "local decode buffer lock poisoned; decode dropped"),
        }
    }

    /// All decodes no older than `max_age` at `now`.
    pub fn recent(&self, now: Instant, max_age: Duration) -> Vec<LocalDecode> {
        match self.inner.lock() {
            Ok(decodes) => decodes
                .iter()
                .filter(|d| d.age(now) <= max_age)
                .cloned()
                .collect(),
            Err(e) => {
                error!(error = %e, "local decode buffer lock poisoned; serving empty");
                Vec::new()
            }
        }
    }

    /// The most recent offset at which `call` was decoded, if any.
    ///
    /// Used to track the target's transmit frequency from our own receiver
    /// rather than waiting on third-party feed latency.
    pub fn latest_offset_of(
        &self,
        call: &Callsign,
        now: Instant,
        max_age: Duration,
    ) -> Option<u32> {
        self.recent(now, max_age)
            .into_iter()
            .filter(|d| d.sender.matches(call))
            .max_by_key(|d| d.received_at)
            .map(|d| d.offset_hz)
    }

    /// Whether we decoded a message from `from` directed at `to`.
    ///
    /// The strongest local evidence that a path is open: the remote
    /// station answered us off our own receiver, regardless of what any
    /// spotting network has propagated yet.
    pub fn directed_reply(
        &self,
        from: &Callsign,
        to: &Callsign,
        now: Instant,
        max_age: Duration,
    ) -> bool {
        self.recent(now, max_age).iter().any(|d| {
            d.sender.matches(from)
                && d.directed_to
                    .as_ref()
                    .is_some_and(|addressee| addressee.matches(to))
        })
    }

    /// Drop decodes older than `retention` at `now`; returns removed count.
    pub fn prune(&self, now: Instant, retention: Duration) -> usize {
        match self.inner.lock() {
            Ok(mut decodes) => {
                let before = decodes.len();
                decodes.retain(|d| d.age(now) <= retention);
                before - decodes.len()
            }
            Err(e) => {
                error!(error = %e, "local decode buffer lock poisoned; prune skipped");
                0
            }
        }
    }

    /// Number of buffered decodes.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|d| d.len()).unwrap_or(0)
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LocalDecodeBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(sender: &str, offset_hz: u32, directed_to: Option<&str>, at: Instant) -> LocalDecode {
        LocalDecode {
            sender: Callsign::new(sender),
            offset_hz,
            snr_db: -8,
            directed_to: directed_to.map(Callsign::new),
            received_at: at,
        }
    }

    const WINDOW: Duration = Duration::from_secs(45);

    #[test]
    fn recent_filters_by_age() {
        let buffer = LocalDecodeBuffer::new();
        let start = Instant::now();
        buffer.insert(decode("K1ABC", 1000, None, start));
        buffer.insert(decode("N0XYZ", 1100, None, start + Duration::from_secs(40)));

        let now = start + Duration::from_secs(50);
        let fresh = buffer.recent(now, WINDOW);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].sender, Callsign::new("N0XYZ"));
    }

    #[test]
    fn latest_offset_prefers_newest() {
        let buffer = LocalDecodeBuffer::new();
        let start = Instant::now();
        buffer.insert(decode("JA1XYZ", 900, None, start));
        buffer.insert(decode("JA1XYZ", 950, None, start + Duration::from_secs(15)));

        let now = start + Duration::from_secs(20);
        assert_eq!(
            buffer.latest_offset_of(&Callsign::new("JA1XYZ"), now, WINDOW),
            Some(950)
        );
    }

    #[test]
    fn directed_reply_requires_addressee() {
        let buffer = LocalDecodeBuffer::new();
        let now = Instant::now();
        buffer.insert(decode("JA1XYZ", 900, None, now));
        assert!(!buffer.directed_reply(
            &Callsign::new("JA1XYZ"),
            &Callsign::new("WU2C"),
            now,
            WINDOW
        ));

        buffer.insert(decode("JA1XYZ", 900, Some("WU2C"), now));
        assert!(buffer.directed_reply(
            &Callsign::new("JA1XYZ"),
            &Callsign::new("WU2C"),
            now,
            WINDOW
        ));
    }

    #[test]
    fn prune_drops_stale_decodes() {
        let buffer = LocalDecodeBuffer::new();
        let start = Instant::now();
        buffer.insert(decode("K1ABC", 1000, None, start));
        buffer.insert(decode("N0XYZ", 1100, None, start + Duration::from_secs(44)));

        let now = start + Duration::from_secs(46);
        assert_eq!(buffer.prune(now, WINDOW), 1);
        assert_eq!(buffer.len(), 1);
    }
}
