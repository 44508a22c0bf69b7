//! Callsign newtype with portable-designator handling.

use std::fmt;

/// An amateur radio callsign, stored uppercase.
///
/// Portable operation produces compound calls like `EA8/W1AW` or `W1AW/P`.
/// For matching purposes the interesting part is the base call, which
/// [`Callsign::base`] extracts by taking the longest slash-separated
/// segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Callsign(String);

impl Callsign {
    /// Create a callsign, normalizing to uppercase and stripping the
    /// angle brackets some decoders wrap hashed calls in.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let cleaned: String = raw
            .as_ref()
            .trim()
            .chars()
            .filter(|c| *c != '<' && *c != '>')
            .collect();
        Self(cleaned.to_ascii_uppercase())
    }

    /// The full callsign as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The base call: for compound calls, the longest slash segment.
    ///
    /// `EA8/W1AW` and `W1AW/P` both yield `W1AW`; a plain call is returned
    /// unchanged.
    pub fn base(&self) -> &str {
        if self.0.contains('/') {
            self.0
                .split('/')
                .max_by_key(|part| part.len())
                .unwrap_or(&self.0)
        } else {
            &self.0
        }
    }

    /// Whether two callsigns refer to the same station, comparing base
    /// calls so portable variants match.
    pub fn matches(&self, other: &Callsign) -> bool {
        self == other || self.base() == other.base()
    }

    /// True for the empty callsign, which the ingest adapter should have
    /// filtered but which must not panic downstream.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Callsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Callsign {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callsign_uppercases_and_trims() {
        let call = Callsign::new(" w1aw ");
        assert_eq!(call.as_str(), "W1AW");
    }

    #[test]
    fn callsign_strips_angle_brackets() {
        let call = Callsign::new("<W1AW>");
        assert_eq!(call.as_str(), "W1AW");
    }

    #[test]
    fn base_of_plain_call_is_itself() {
        assert_eq!(Callsign::new("K1ABC").base(), "K1ABC");
    }

    #[test]
    fn base_of_prefixed_call() {
        assert_eq!(Callsign::new("EA8/W1AW").base(), "W1AW");
    }

    #[test]
    fn base_of_suffixed_call() {
        assert_eq!(Callsign::new("W1AW/P").base(), "W1AW");
    }

    #[test]
    fn matches_portable_variant() {
        let home = Callsign::new("W1AW");
        let portable = Callsign::new("W1AW/7");
        assert!(home.matches(&portable));
        assert!(portable.matches(&home));
    }

    #[test]
    fn does_not_match_different_station() {
        let a = Callsign::new("W1AW");
        let b = Callsign::new("K1ABC");
        assert!(!a.matches(&b));
    }
}
