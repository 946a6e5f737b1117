//! Reservations and the date ranges they cover.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::common::Identifiable;

const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("invalid date `{0}` (use YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("expected a range like 2025-07-01..2025-07-05, got `{0}`")]
    Malformed(String),
}

/// Calendar date range; both ends are inclusive when testing availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if end < start {
            return Err(DateRangeError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Calendar-day difference between the two ends.
    pub fn nights(&self) -> u32 {
        u32::try_from((self.end - self.start).num_days()).unwrap_or(0)
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Every date from start to end, both included.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    /// Parses `start..end` or `start end` with `YYYY-MM-DD` dates.
    pub fn parse(raw: &str) -> Result<Self, DateRangeError> {
        let raw = raw.trim();
        let (start, end) = raw
            .split_once("..")
            .or_else(|| raw.split_once(char::is_whitespace))
            .ok_or_else(|| DateRangeError::Malformed(raw.to_string()))?;
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn to_input(&self) -> String {
        format!(
            "{}..{}",
            self.start.format(INPUT_DATE_FORMAT),
            self.end.format(INPUT_DATE_FORMAT)
        )
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format(DISPLAY_DATE_FORMAT),
            self.end.format(DISPLAY_DATE_FORMAT)
        )
    }
}

/// Accepts a plain date or the date prefix of an ISO-8601 timestamp.
pub fn parse_date(raw: &str) -> Result<NaiveDate, DateRangeError> {
    let trimmed = raw.trim();
    let candidate = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(candidate, INPUT_DATE_FORMAT)
        .map_err(|_| DateRangeError::InvalidDate(trimmed.to_string()))
}

/// A guest's booking of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: u64,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(listing_id: Uuid, user_id: Uuid, range: DateRange, total_price: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            listing_id,
            user_id,
            start_date: range.start,
            end_date: range.end,
            total_price,
            created_at: Utc::now(),
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

impl Identifiable for Reservation {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn nights_counts_calendar_days() {
        let range = DateRange::new(date("2025-07-01"), date("2025-07-05")).unwrap();
        assert_eq!(range.nights(), 4);
        assert_eq!(range.days().count(), 5);
        let same_day = DateRange::new(date("2025-07-01"), date("2025-07-01")).unwrap();
        assert_eq!(same_day.nights(), 0);
    }

    #[test]
    fn overlap_is_inclusive() {
        let a = DateRange::new(date("2025-07-01"), date("2025-07-05")).unwrap();
        let touching = DateRange::new(date("2025-07-05"), date("2025-07-08")).unwrap();
        let later = DateRange::new(date("2025-07-06"), date("2025-07-08")).unwrap();
        assert!(a.overlaps(&touching));
        assert!(touching.overlaps(&a));
        assert!(!a.overlaps(&later));
    }

    #[test]
    fn parse_accepts_both_separators() {
        let dotted = DateRange::parse("2025-07-01..2025-07-03").unwrap();
        let spaced = DateRange::parse("2025-07-01 2025-07-03").unwrap();
        assert_eq!(dotted, spaced);
        assert_eq!(dotted.to_input(), "2025-07-01..2025-07-03");
        assert_eq!(dotted.to_string(), "Jul 1, 2025 - Jul 3, 2025");
    }

    #[test]
    fn parse_rejects_reversed_and_garbage() {
        assert!(matches!(
            DateRange::parse("2025-07-03..2025-07-01"),
            Err(DateRangeError::EndBeforeStart { .. })
        ));
        assert!(matches!(
            DateRange::parse("tomorrow"),
            Err(DateRangeError::Malformed(_))
        ));
        assert_eq!(
            parse_date("2025-07-01T00:00:00+01:00").unwrap(),
            date("2025-07-01")
        );
    }
}
