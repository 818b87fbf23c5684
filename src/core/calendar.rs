//! Local calendar-day bucketing for as-of projections.
use crate::errors::{Error, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};

/// Converts event instants into the merchant's local calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerClock {
    /// The host machine's local time zone
    #[default]
    Local,
    /// A fixed offset from UTC
    Fixed(FixedOffset),
}

impl LedgerClock {
    /// Parses an offset such as `"+05:30"` or `"-03:00"`.
    pub fn from_offset(offset: &str) -> Result<Self> {
        offset
            .trim()
            .parse::<FixedOffset>()
            .map(Self::Fixed)
            .map_err(|e| Error::Config {
                message: format!("Invalid utc_offset '{offset}': {e}"),
            })
    }

    /// The calendar day `instant` falls on in this clock's zone.
    #[must_use]
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Local => instant.with_timezone(&Local).date_naive(),
            Self::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }
}
