use crate::schedule::ScheduledCommitBatch;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub matrix_path: String,
    pub anchor: DateTime<FixedOffset>,
    pub earliest: NaiveDate,
    pub factor: u32,
    pub total_commits: u64,
    pub batches: Vec<ScheduledCommitBatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IllustrateOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub matrix_path: String,
    pub anchor: DateTime<FixedOffset>,
    pub factor: u32,
    pub dated_commits: u64,
    pub cells_committed: usize,
    pub cells_skipped: usize,
    pub first_commit: Option<DateTime<FixedOffset>>,
    pub last_commit: Option<DateTime<FixedOffset>>,
    pub readme_commit: DateTime<FixedOffset>,
}
