//! Day-window arithmetic for the three fixed queries.

use chrono::{DateTime, Local, NaiveDate, TimeDelta, TimeZone};
use serde::Serialize;

/// One of the three fixed day windows queried against the market-results
/// service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayWindow {
    /// The day before the current local date.
    Yesterday,
    /// The current local date.
    Today,
    /// The day after the current local date.
    Tomorrow,
}

impl DayWindow {
    /// All windows in query order.
    pub const ALL: [Self; 3] = [Self::Yesterday, Self::Today, Self::Tomorrow];

    /// Offset in days relative to the current local date.
    #[must_use]
    pub const fn offset_days(self) -> i64 {
        match self {
            Self::Yesterday => -1,
            Self::Today => 0,
            Self::Tomorrow => 1,
        }
    }

    /// Human-readable query name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yesterday => "Market Results Yesterday",
            Self::Today => "Market Results Today",
            Self::Tomorrow => "Market Results Tomorrow",
        }
    }

    /// The calendar date this window queries, relative to `now`.
    #[must_use]
    pub fn query_date(self, now: DateTime<Local>) -> NaiveDate {
        now.date_naive() + TimeDelta::days(self.offset_days())
    }

    /// Local midnight at the start of this window's date.
    ///
    /// Hourly offsets inside the response are added to this instant in
    /// whole seconds (hour x 3600). If local midnight does not exist
    /// because of a DST transition, the earliest valid interpretation is
    /// used, falling back to treating the naive midnight as UTC.
    #[must_use]
    pub fn day_start(self, now: DateTime<Local>) -> DateTime<Local> {
        let midnight = self
            .query_date(now)
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time of day");
        Local
            .from_local_datetime(&midnight)
            .earliest()
            .unwrap_or_else(|| Local.from_utc_datetime(&midnight))
    }
}

impl std::fmt::Display for DayWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
