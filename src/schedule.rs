//! Maps matrix cells onto calendar days ending at an anchor timestamp.
//!
//! Column 0, row 0 of the matrix lands on the Sunday that opens the 53-week
//! window whose last Saturday closes the anchor's week. Each following cell
//! is the next calendar day, so rows line up with days of the week.

use crate::error::{ArtError, Result};
use crate::matrix::{Matrix, Value, AREA};
use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, Weekday};
use serde::Serialize;

/// Returns the Saturday closing the Sunday-first week that contains `date`.
pub fn align_to_week_boundary(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Sun).last_day()
}

/// Day before the first cell is drawn.
pub fn earliest_date(today: NaiveDate) -> Result<NaiveDate> {
    align_to_week_boundary(today)
        .checked_sub_days(Days::new(AREA as u64))
        .ok_or_else(|| ArtError::InvalidDate(format!("no calendar window ends at {today}")))
}

/// Midnight of `timestamp`'s day, in its own offset.
pub fn truncate_to_day(timestamp: DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>> {
    midnight(timestamp.date_naive(), timestamp.timezone())
}

fn midnight(date: NaiveDate, offset: FixedOffset) -> Result<DateTime<FixedOffset>> {
    date.and_time(NaiveTime::MIN)
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| ArtError::InvalidDate(format!("{date} is out of range")))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub timestamp: DateTime<FixedOffset>,
}

impl Identity {
    pub fn new(name: &str, email: &str, timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            timestamp,
        }
    }

    pub fn seconds(&self) -> i64 {
        self.timestamp.timestamp()
    }

    pub fn offset_seconds(&self) -> i32 {
        self.timestamp.offset().local_minus_utc()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledCommitBatch {
    /// Position in the column-major traversal.
    pub cell: usize,
    pub date: DateTime<FixedOffset>,
    pub value: Value,
    pub count: u64,
    pub identity: Identity,
}

#[derive(Debug, Clone)]
pub struct Schedule {
    now: DateTime<FixedOffset>,
    anchor: DateTime<FixedOffset>,
    earliest: NaiveDate,
    factor: u32,
}

impl Schedule {
    pub fn new(now: DateTime<FixedOffset>, factor: u32) -> Result<Self> {
        let anchor = truncate_to_day(now)?;
        let earliest = earliest_date(anchor.date_naive())?;
        Ok(Self {
            now,
            anchor,
            earliest,
            factor,
        })
    }

    /// Day-truncated `now`, used for the README commit.
    pub fn anchor(&self) -> DateTime<FixedOffset> {
        self.anchor
    }

    pub fn earliest(&self) -> NaiveDate {
        self.earliest
    }

    pub fn factor(&self) -> u32 {
        self.factor
    }

    /// Date assigned to the `cell`-th value of the traversal.
    pub fn date_of(&self, cell: usize) -> Result<DateTime<FixedOffset>> {
        let date = self
            .earliest
            .checked_add_days(Days::new(cell as u64 + 1))
            .ok_or_else(|| ArtError::InvalidDate(format!("cell {cell} falls outside the calendar")))?;
        midnight(date, self.anchor.timezone())
    }

    /// Batches for every cell not dated after `now`, in chronological order.
    ///
    /// Cells with zero weight still produce a batch with `count == 0`.
    pub fn plan(&self, matrix: &Matrix, name: &str, email: &str) -> Result<Vec<ScheduledCommitBatch>> {
        let mut batches = Vec::with_capacity(AREA);
        for (cell, value) in matrix.values().enumerate() {
            let date = self.date_of(cell)?;
            if date > self.now {
                continue;
            }
            batches.push(ScheduledCommitBatch {
                cell,
                date,
                value,
                count: u64::from(value.weight()) * u64::from(self.factor),
                identity: Identity::new(name, email, date),
            });
        }
        Ok(batches)
    }
}
