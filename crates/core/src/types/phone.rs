//! Normalized phone numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A phone number normalized to its semantic key.
///
/// Normalization strips every character except ASCII digits and a single
/// leading `+`. Equality, hashing, and cache keys are always computed on the
/// normalized form, so `"+976 99-112233"` and `"(+976) 99 11 22 33"` share
/// one identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize a raw number string into its semantic key.
    pub fn normalize(raw: &str) -> Self {
        let mut out = String::with_capacity(raw.len());
        for c in raw.trim().chars() {
            if c.is_ascii_digit() {
                out.push(c);
            } else if c == '+' && out.is_empty() {
                out.push(c);
            }
        }
        Self(out)
    }

    /// The normalized form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the raw input contained no digits at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty() || self.0 == "+"
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhoneNumber {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_formatting_characters() {
        assert_eq!(PhoneNumber::normalize("+976 99-112233").as_str(), "+97699112233");
        assert_eq!(PhoneNumber::normalize("(99) 112233").as_str(), "99112233");
        assert_eq!(PhoneNumber::normalize("99112233").as_str(), "99112233");
    }

    #[test]
    fn equivalent_raw_strings_share_one_key() {
        assert_eq!(
            PhoneNumber::normalize("99-112233"),
            PhoneNumber::normalize("(99) 112233")
        );
        assert_ne!(
            PhoneNumber::normalize("+97699112233"),
            PhoneNumber::normalize("99112233")
        );
    }

    #[test]
    fn plus_is_kept_only_in_leading_position() {
        assert_eq!(PhoneNumber::normalize("++976").as_str(), "+976");
        assert_eq!(PhoneNumber::normalize("99+112233").as_str(), "99112233");
        assert_eq!(PhoneNumber::normalize("  +976 99 ").as_str(), "+97699");
    }

    #[test]
    fn empty_detection() {
        assert!(PhoneNumber::normalize("").is_empty());
        assert!(PhoneNumber::normalize("abc").is_empty());
        assert!(PhoneNumber::normalize("+").is_empty());
        assert!(!PhoneNumber::normalize("1").is_empty());
    }
}
