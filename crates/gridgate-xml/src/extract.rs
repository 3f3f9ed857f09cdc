//! Market-results extraction from the XML event stream.

use chrono::{DateTime, Local, TimeDelta};
use gridgate_types::{ChunkBuffer, FieldIssue, HourlyResult};
use tracing::{trace, warn};

use crate::ElementHandler;

/// Handler state machine that rebuilds [`HourlyResult`] records from
/// open/close/text events.
///
/// One extractor is created per query execution with the day-start
/// instant already computed; nothing is shared across queries. A record
/// is emitted at exactly one point: the close of a `MarketResultsHourly`
/// element. Unrecognized elements and attributes are ignored.
#[derive(Debug)]
pub struct MarketResultsExtractor {
    day_start: DateTime<Local>,
    /// Character data accumulated since the last tag, cleared on every
    /// close so text between unrelated tags cannot leak into the next
    /// field.
    text: ChunkBuffer,
    /// Per-location template: reset on each `MarketResults` open, cloned
    /// into every hourly record under it.
    block: HourlyResult,
    current: Option<HourlyResult>,
    saw_cleared_mw: bool,
    records: Vec<HourlyResult>,
}

impl MarketResultsExtractor {
    /// Creates an extractor for a query whose day starts at the given
    /// local instant.
    #[must_use]
    pub fn new(day_start: DateTime<Local>) -> Self {
        Self {
            day_start,
            text: ChunkBuffer::new(),
            block: HourlyResult::new(day_start),
            current: None,
            saw_cleared_mw: false,
            records: Vec::new(),
        }
    }

    /// Records emitted so far, in document order.
    #[must_use]
    pub fn records(&self) -> &[HourlyResult] {
        &self.records
    }

    /// Consumes the extractor, returning the emitted records.
    #[must_use]
    pub fn into_records(self) -> Vec<HourlyResult> {
        self.records
    }

    fn accumulated_text(&self) -> String {
        String::from_utf8_lossy(self.text.as_slice()).into_owned()
    }
}

impl ElementHandler for MarketResultsExtractor {
    fn on_open(&mut self, name: &str, attributes: &[(String, String)]) {
        match name {
            "MarketResults" => {
                self.block = HourlyResult::new(self.day_start);
                self.current = None;
                if let Some(location) = attribute(attributes, "location") {
                    self.block.set_location(location);
                    if self.block.has_issues() {
                        warn!(
                            location,
                            truncated = %self.block.location,
                            "location attribute too long, truncated"
                        );
                    }
                }
            }
            "MarketResultsHourly" => {
                let mut record = self.block.clone();
                if let Some(raw) = attribute(attributes, "hour") {
                    // Bounded parse: a negative or astronomically large
                    // hour must degrade to a flagged record, not panic
                    // in the date arithmetic.
                    let timestamp = raw.trim().parse::<u32>().ok().and_then(|hour| {
                        TimeDelta::try_seconds(i64::from(hour) * 3600)
                            .and_then(|offset| self.day_start.checked_add_signed(offset))
                    });
                    match timestamp {
                        Some(timestamp) => record.timestamp = timestamp,
                        None => {
                            warn!(hour = raw, "unusable hour attribute, using day start");
                            record.flag(FieldIssue::Malformed { field: "hour" });
                        }
                    }
                }
                self.saw_cleared_mw = false;
                self.current = Some(record);
            }
            _ => {}
        }
    }

    fn on_text(&mut self, text: &[u8]) {
        self.text.append(text);
    }

    fn on_close(&mut self, name: &str) {
        match name {
            "ClearedMW" => {
                let raw = self.accumulated_text();
                if let Some(record) = self.current.as_mut() {
                    match raw.trim().parse::<f64>() {
                        Ok(value) => record.cleared_mw = value,
                        Err(_) => {
                            warn!(value = raw.trim(), "unparseable ClearedMW, defaulting to 0");
                            record.flag(FieldIssue::Malformed { field: "ClearedMW" });
                        }
                    }
                    self.saw_cleared_mw = true;
                }
            }
            "MarketResultsHourly" => {
                if let Some(mut record) = self.current.take() {
                    if !self.saw_cleared_mw {
                        record.flag(FieldIssue::Malformed { field: "ClearedMW" });
                    }
                    trace!(
                        timestamp = %record.timestamp,
                        location = %record.location,
                        cleared_mw = record.cleared_mw,
                        "emitting hourly record"
                    );
                    self.records.push(record);
                }
            }
            _ => {}
        }
        self.text.clear();
    }
}

/// Looks up an attribute value by name.
fn attribute<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}
