//! Hourly market-clearing records.

use chrono::{DateTime, Local};
use serde::Serialize;

/// Maximum byte length of a location identifier.
///
/// Longer attribute values are truncated at a character boundary and the
/// record is flagged with [`FieldIssue::Overflow`] instead of being
/// silently corrupted.
pub const LOCATION_MAX: usize = 31;

/// A field-level problem that was recovered with a default value.
///
/// Issues never abort a parse; they travel with the emitted record so
/// that callers can decide how loudly to report them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldIssue {
    /// A string field exceeded its fixed capacity and was truncated.
    Overflow {
        /// Name of the affected field.
        field: &'static str,
    },
    /// A recognized field's value was absent or not parseable.
    Malformed {
        /// Name of the affected field.
        field: &'static str,
    },
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overflow { field } => write!(f, "{field} overflowed and was truncated"),
            Self::Malformed { field } => write!(f, "{field} malformed, default used"),
        }
    }
}

/// One hourly market-clearing record emitted by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyResult {
    /// Absolute instant of the hour: day start + hour offset x 3600 s.
    pub timestamp: DateTime<Local>,
    /// Pricing location identifier, at most [`LOCATION_MAX`] bytes.
    pub location: String,
    /// Cleared megawatts for the hour. Defaults to 0.0 when the
    /// `ClearedMW` element is absent or unparseable.
    pub cleared_mw: f64,
    /// Field-level problems encountered while building this record.
    pub issues: Vec<FieldIssue>,
}

impl HourlyResult {
    /// Creates an empty record at the given instant.
    #[must_use]
    pub const fn new(timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            location: String::new(),
            cleared_mw: 0.0,
            issues: Vec::new(),
        }
    }

    /// Sets the location, truncating to [`LOCATION_MAX`] bytes and
    /// flagging [`FieldIssue::Overflow`] if the value is too long.
    pub fn set_location(&mut self, value: &str) {
        if value.len() > LOCATION_MAX {
            self.location = truncate_at_char_boundary(value, LOCATION_MAX).to_owned();
            self.issues.push(FieldIssue::Overflow { field: "location" });
        } else {
            self.location = value.to_owned();
        }
    }

    /// Records a field-level problem on this record.
    pub fn flag(&mut self, issue: FieldIssue) {
        self.issues.push(issue);
    }

    /// Returns true if any field-level problem was recorded.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Truncates `s` to at most `max` bytes without splitting a character.
fn truncate_at_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn some_instant() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_new_record_defaults() {
        let record = HourlyResult::new(some_instant());
        assert_eq!(record.location, "");
        assert_eq!(record.cleared_mw, 0.0);
        assert!(!record.has_issues());
    }

    #[test]
    fn test_set_location_within_bound() {
        let mut record = HourlyResult::new(some_instant());
        record.set_location("AECO");
        assert_eq!(record.location, "AECO");
        assert!(!record.has_issues());
    }

    #[test]
    fn test_set_location_overflow_truncates_and_flags() {
        let mut record = HourlyResult::new(some_instant());
        let long = "X".repeat(40);
        record.set_location(&long);
        assert_eq!(record.location.len(), LOCATION_MAX);
        assert_eq!(record.location, "X".repeat(LOCATION_MAX));
        assert_eq!(record.issues, vec![FieldIssue::Overflow { field: "location" }]);
    }

    #[test]
    fn test_set_location_overflow_respects_char_boundary() {
        let mut record = HourlyResult::new(some_instant());
        // 15 two-byte characters: 30 bytes, then one more crossing the
        // 31-byte bound at byte 32.
        let value = "é".repeat(16);
        record.set_location(&value);
        assert_eq!(record.location, "é".repeat(15));
        assert!(record.location.len() <= LOCATION_MAX);
        assert!(record.has_issues());
    }

    #[test]
    fn test_exactly_max_is_not_flagged() {
        let mut record = HourlyResult::new(some_instant());
        let value = "A".repeat(LOCATION_MAX);
        record.set_location(&value);
        assert_eq!(record.location, value);
        assert!(!record.has_issues());
    }

    #[test]
    fn test_issue_display() {
        let overflow = FieldIssue::Overflow { field: "location" };
        let malformed = FieldIssue::Malformed { field: "hour" };
        assert_eq!(overflow.to_string(), "location overflowed and was truncated");
        assert_eq!(malformed.to_string(), "hour malformed, default used");
    }
}
