//! Ordered index of navigable media moments.
//!
//! The backend sends start times as either JSON numbers or strings.
//! Ingestion normalizes each one to a finite non-negative `f64`; entries
//! that fail to parse are dropped individually so one malformed entry
//! never discards the rest of an otherwise valid response.

use std::fmt;

use scrub_core::types::{RawTime, RawTimestamp};

/// One validated navigable moment.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampEntry {
    /// Seek target in seconds from the start of the media. Finite, >= 0.
    pub start_seconds: f64,
    /// Human-readable description of the moment.
    pub label: String,
}

impl fmt::Display for TimestampEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} sec: {}", self.start_seconds, self.label)
    }
}

/// Ordered sequence of validated timestamps.
///
/// Server-supplied order is semantically meaningful and is preserved, not
/// re-sorted. Replaced wholesale on every new response.
#[derive(Debug, Clone, Default)]
pub struct TimestampIndex {
    entries: Vec<TimestampEntry>,
}

impl TimestampIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the index with the validated subset of `raw`.
    ///
    /// Returns how many entries were dropped for failing validation.
    pub fn replace(&mut self, raw: &[RawTimestamp]) -> usize {
        let mut dropped = 0;
        self.entries = raw
            .iter()
            .filter_map(|entry| match parse_start_time(&entry.start_time) {
                Some(start_seconds) => Some(TimestampEntry {
                    start_seconds,
                    label: entry.text.clone(),
                }),
                None => {
                    dropped += 1;
                    tracing::warn!(
                        start_time = ?entry.start_time,
                        text = %entry.text,
                        "Dropping timestamp with unparseable start time"
                    );
                    None
                }
            })
            .collect();
        dropped
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Ordered view of the surviving entries.
    pub fn entries(&self) -> &[TimestampEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalize a raw start time to a finite non-negative seconds value.
fn parse_start_time(raw: &RawTime) -> Option<f64> {
    let value = match raw {
        RawTime::Number(n) => *n,
        RawTime::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    (value.is_finite() && value >= 0.0).then_some(value)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn num(start: f64, text: &str) -> RawTimestamp {
        RawTimestamp {
            start_time: RawTime::Number(start),
            text: text.to_string(),
        }
    }

    fn txt(start: &str, text: &str) -> RawTimestamp {
        RawTimestamp {
            start_time: RawTime::Text(start.to_string()),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_new_index_is_empty() {
        let index = TimestampIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_replace_parses_numbers_and_strings() {
        let mut index = TimestampIndex::new();
        let dropped = index.replace(&[num(12.5, "intro"), txt("99.25", "outro")]);
        assert_eq!(dropped, 0);
        assert_eq!(index.entries()[0].start_seconds, 12.5);
        assert_eq!(index.entries()[1].start_seconds, 99.25);
    }

    #[test]
    fn test_replace_drops_malformed_keeps_order() {
        let mut index = TimestampIndex::new();
        let dropped = index.replace(&[txt("12.5", "a"), txt("bad", "b"), num(7.0, "c")]);
        assert_eq!(dropped, 1);
        assert_eq!(index.len(), 2);
        assert_eq!(index.entries()[0].start_seconds, 12.5);
        assert_eq!(index.entries()[0].label, "a");
        assert_eq!(index.entries()[1].start_seconds, 7.0);
        assert_eq!(index.entries()[1].label, "c");
    }

    #[test]
    fn test_replace_rejects_non_finite() {
        let mut index = TimestampIndex::new();
        let dropped = index.replace(&[
            num(f64::NAN, "nan"),
            num(f64::INFINITY, "inf"),
            txt("inf", "inf text"),
            num(3.0, "fine"),
        ]);
        assert_eq!(dropped, 3);
        assert_eq!(index.len(), 1);
        assert_eq!(index.entries()[0].label, "fine");
    }

    #[test]
    fn test_replace_rejects_negative() {
        let mut index = TimestampIndex::new();
        let dropped = index.replace(&[num(-0.5, "before start"), num(0.0, "start")]);
        assert_eq!(dropped, 1);
        assert_eq!(index.entries()[0].start_seconds, 0.0);
    }

    #[test]
    fn test_replace_trims_string_values() {
        let mut index = TimestampIndex::new();
        index.replace(&[txt("  42.0  ", "padded")]);
        assert_eq!(index.entries()[0].start_seconds, 42.0);
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut index = TimestampIndex::new();
        index.replace(&[num(1.0, "old")]);
        index.replace(&[num(2.0, "new")]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.entries()[0].label, "new");
    }

    #[test]
    fn test_replace_with_empty_clears() {
        let mut index = TimestampIndex::new();
        index.replace(&[num(1.0, "old")]);
        index.replace(&[]);
        assert!(index.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut index = TimestampIndex::new();
        index.replace(&[num(1.0, "a"), num(2.0, "b")]);
        index.clear();
        assert!(index.is_empty());
    }

    #[test]
    fn test_display_two_decimal_format() {
        let entry = TimestampEntry {
            start_seconds: 12.5,
            label: "key point".to_string(),
        };
        assert_eq!(entry.to_string(), "12.50 sec: key point");
    }

    #[test]
    fn test_order_not_sorted() {
        // Server order is meaningful; a descending input stays descending.
        let mut index = TimestampIndex::new();
        index.replace(&[num(30.0, "late"), num(10.0, "early")]);
        assert_eq!(index.entries()[0].start_seconds, 30.0);
        assert_eq!(index.entries()[1].start_seconds, 10.0);
    }
}
