pub mod cli;
pub mod error;
pub mod git;
pub mod illustrate;
pub mod matrix;
pub mod model;
pub mod output;
pub mod schedule;
pub mod util;

pub use error::{ArtError, Result};
pub use git::GitRepo;
pub use illustrate::{illustrate, Backend, IllustrateOptions, IllustrationSummary, README};
pub use matrix::{Matrix, Value, AREA, COLUMNS, ROWS};
pub use schedule::{align_to_week_boundary, Identity, Schedule, ScheduledCommitBatch};
