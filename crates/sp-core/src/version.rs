//! Persisted schema version

use crate::error::{CoreError, CoreResult};
use std::fmt;

/// Highest successfully applied patch ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SchemaVersion(u32);

impl SchemaVersion {
    /// Wrap a raw ordinal
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Parse a stored version value.
    ///
    /// Accepts surrounding whitespace; anything other than a non-negative
    /// integer is a configuration error.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidVersion {
                value: raw.to_string(),
            });
        }
        trimmed
            .parse::<u32>()
            .map(Self)
            .map_err(|_| CoreError::InvalidVersion {
                value: raw.to_string(),
            })
    }

    /// Raw ordinal value
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Version following this one; fails at the top of the range
    pub fn next(self) -> CoreResult<Self> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or(CoreError::VersionOverflow { value: self.0 })
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SchemaVersion {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_integer() {
        assert_eq!(SchemaVersion::parse("42").unwrap().get(), 42);
        assert_eq!(SchemaVersion::parse(" 7\n").unwrap().get(), 7);
        assert_eq!(SchemaVersion::parse("0").unwrap(), SchemaVersion::default());
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        for raw in ["abc", "", "  ", "-1", "1.5", "+3", "12a"] {
            let err = SchemaVersion::parse(raw).unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidVersion { .. }),
                "expected InvalidVersion for {raw:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(SchemaVersion::parse("99999999999999999999").is_err());
    }

    #[test]
    fn test_next_and_display() {
        let v = SchemaVersion::new(4);
        assert_eq!(v.next().unwrap().to_string(), "5");
        assert!(v < v.next().unwrap());
    }

    #[test]
    fn test_next_at_maximum_is_error() {
        let top = SchemaVersion::parse("4294967295").unwrap();
        let err = top.next().unwrap_err();
        assert!(matches!(err, CoreError::VersionOverflow { value: u32::MAX }));
    }
}
