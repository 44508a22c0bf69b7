//! Maidenhead grid locator.

use std::fmt;

/// A Maidenhead locator of 2, 4 or 6 characters, stored uppercase.
///
/// The hierarchy matters for tiering: a 2-character *field* (e.g. `FN`)
/// contains many 4-character *squares* (e.g. `FN42`), which is the
/// propagation-similarity proxy the perspective engine keys on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid(String);

impl Grid {
    /// Parse a locator, returning `None` for anything malformed.
    ///
    /// Accepts 2, 4 or 6 characters: field letters `A`–`R`, square digits,
    /// subsquare letters `A`–`X`. Longer locators are truncated to 6.
    pub fn parse(raw: impl AsRef<str>) -> Option<Self> {
        let upper = raw.as_ref().trim().to_ascii_uppercase();
        // Locators are ASCII by definition; rejecting anything else up
        // front also keeps the byte truncation below char-boundary safe.
        if !upper.is_ascii() {
            return None;
        }
        let truncated: &str = if upper.len() > 6 { &upper[..6] } else { &upper };
        let bytes = truncated.as_bytes();

        if !matches!(bytes.len(), 2 | 4 | 6) {
            return None;
        }
        if !bytes[..2].iter().all(|b| (b'A'..=b'R').contains(b)) {
            return None;
        }
        if bytes.len() >= 4 && !bytes[2..4].iter().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if bytes.len() == 6 && !bytes[4..6].iter().all(|b| (b'A'..=b'X').contains(b)) {
            return None;
        }
        Some(Self(truncated.to_string()))
    }

    /// The full locator as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 2-character field, e.g. `FN` for `FN42AA`.
    pub fn field(&self) -> &str {
        &self.0[..2]
    }

    /// The 4-character square, e.g. `FN42` for `FN42AA`.
    ///
    /// Returns `None` for a field-only locator, which cannot be placed at
    /// square precision.
    pub fn square(&self) -> Option<&str> {
        if self.0.len() >= 4 {
            Some(&self.0[..4])
        } else {
            None
        }
    }

    /// Whether this locator falls inside the given square prefix.
    pub fn in_square(&self, square: &str) -> bool {
        self.square().is_some_and(|s| s == square)
    }

    /// Whether this locator falls inside the given field prefix.
    pub fn in_field(&self, field: &str) -> bool {
        self.field() == field
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
