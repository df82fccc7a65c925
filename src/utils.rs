//! Utility functions and types.

use std::fmt::Debug;

/// Prints a secret with only its first and last three characters visible.
///
/// Short values (under 12 characters) are masked entirely, since showing
/// their edges would reveal a meaningful share of the secret; empty or
/// missing values print as `EMPTY` so absent configuration stays
/// distinguishable from a masked one. `Credential`'s `Debug` impl wraps its
/// key material in this so access keys never reach logs whole.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        match value {
            None => Redact(""),
            Some(v) => Redact(v),
        }
    }
}

impl<'a> Debug for Redact<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.len() {
            0 => f.write_str("EMPTY"),
            n if n < 12 => f.write_str("***"),
            n => write!(f, "{}***{}", &self.0[..3], &self.0[n - 3..]),
        }
    }
}
