use crate::error::Result;
use crate::matrix::{Matrix, AREA};
use crate::schedule::{Identity, Schedule, ScheduledCommitBatch};
use chrono::{DateTime, FixedOffset};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{debug, info};

pub const README_FILE: &str = "README.md";

pub const README: &str = "# Contribution Graph Artwork\n\n\
This repository was programmatically generated by contribution-art, \
a tool which draws custom artwork on a contribution calendar by backdating commits.\n";

/// Version-control operations the illustrator drives, in call order.
pub trait Backend {
    fn workdir(&self) -> &Path;

    /// Stage `path`, relative to the working directory, for the next commit.
    fn add(&mut self, path: &Path) -> Result<()>;

    fn commit(&mut self, message: &str, author: &Identity, committer: &Identity) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct IllustrateOptions {
    pub factor: u32,
    pub name: String,
    pub email: String,
    pub now: DateTime<FixedOffset>,
    pub show_progress: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllustrationSummary {
    pub anchor: DateTime<FixedOffset>,
    pub dated_commits: u64,
    pub cells_committed: usize,
    pub cells_skipped: usize,
    pub first_commit: Option<DateTime<FixedOffset>>,
    pub last_commit: Option<DateTime<FixedOffset>>,
}

/// Commit `matrix` into `backend` so its history draws the matrix, then commit the README.
///
/// Commits made before a failing backend call are left in place.
pub fn illustrate<B: Backend>(
    backend: &mut B,
    matrix: &Matrix,
    options: &IllustrateOptions,
) -> Result<IllustrationSummary> {
    let schedule = Schedule::new(options.now, options.factor)?;
    let batches = schedule.plan(matrix, &options.name, &options.email)?;

    let pb = if options.show_progress {
        ProgressBar::new(batches.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message("Creating commits...");

    let mut summary = IllustrationSummary {
        anchor: schedule.anchor(),
        dated_commits: 0,
        cells_committed: 0,
        cells_skipped: AREA - batches.len(),
        first_commit: None,
        last_commit: None,
    };

    commit_batches(backend, &batches, &mut summary, &pb)?;
    pb.finish_with_message("Commits created");

    let identity = Identity::new(&options.name, &options.email, schedule.anchor());
    create_file(backend, Path::new(README_FILE), README, &identity)?;

    Ok(summary)
}

/// On failure the bar is abandoned at the last completed batch.
fn commit_batches<B: Backend>(
    backend: &mut B,
    batches: &[ScheduledCommitBatch],
    summary: &mut IllustrationSummary,
    pb: &ProgressBar,
) -> Result<()> {
    for batch in batches {
        for _ in 0..batch.count {
            if let Err(err) = backend.commit("", &batch.identity, &batch.identity) {
                pb.abandon_with_message(format!("Failed at {}", batch.date.date_naive()));
                return Err(err);
            }
        }
        if batch.count > 0 {
            debug!(date = %batch.date, count = batch.count, "created commits");
            summary.dated_commits += batch.count;
            summary.cells_committed += 1;
            summary.first_commit.get_or_insert(batch.date);
            summary.last_commit = Some(batch.date);
        }
        pb.inc(1);
    }
    Ok(())
}

fn create_file<B: Backend>(backend: &mut B, file: &Path, contents: &str, identity: &Identity) -> Result<()> {
    let target = backend.workdir().join(file);
    std::fs::write(&target, contents)?;

    backend.add(file)?;
    backend.commit(&format!("Added {}.", file.display()), identity, identity)?;

    info!(file = %target.display(), timestamp = %identity.timestamp, "created file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArtError;
    use crate::matrix::Value;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    struct Recorded {
        message: String,
        author: Identity,
        committer: Identity,
        staged: Vec<PathBuf>,
    }

    struct RecordingBackend {
        dir: TempDir,
        staged: Vec<PathBuf>,
        commits: Vec<Recorded>,
        fail_after: Option<usize>,
    }

    impl RecordingBackend {
        fn new() -> Self {
            Self {
                dir: tempdir().unwrap(),
                staged: Vec::new(),
                commits: Vec::new(),
                fail_after: None,
            }
        }
    }

    impl Backend for RecordingBackend {
        fn workdir(&self) -> &Path {
            self.dir.path()
        }

        fn add(&mut self, path: &Path) -> Result<()> {
            self.staged.push(path.to_path_buf());
            Ok(())
        }

        fn commit(&mut self, message: &str, author: &Identity, committer: &Identity) -> Result<()> {
            if self.fail_after == Some(self.commits.len()) {
                return Err(ArtError::Git("object database is read-only".into()));
            }
            self.commits.push(Recorded {
                message: message.to_string(),
                author: author.clone(),
                committer: committer.clone(),
                staged: std::mem::take(&mut self.staged),
            });
            Ok(())
        }
    }

    fn options(factor: u32, now: DateTime<FixedOffset>) -> IllustrateOptions {
        IllustrateOptions {
            factor,
            name: "name".to_string(),
            email: "email".to_string(),
            now,
            show_progress: false,
        }
    }

    fn saturday_noon() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 17, 12, 0, 0)
            .unwrap()
    }

    #[test]
    fn commits_weight_times_factor_then_readme() {
        let mut backend = RecordingBackend::new();
        let summary = illustrate(&mut backend, &Matrix::filled(Value::Dark), &options(2, saturday_noon())).unwrap();

        assert_eq!(summary.dated_commits, (AREA * 3 * 2) as u64);
        assert_eq!(summary.cells_committed, AREA);
        assert_eq!(summary.cells_skipped, 0);
        assert_eq!(backend.commits.len(), AREA * 3 * 2 + 1);

        let readme = backend.commits.last().unwrap();
        assert_eq!(readme.message, "Added README.md.");
        assert_eq!(readme.staged, vec![PathBuf::from(README_FILE)]);
        assert_eq!(readme.author.timestamp, summary.anchor);
        assert_eq!(
            std::fs::read_to_string(backend.dir.path().join(README_FILE)).unwrap(),
            README
        );
    }

    #[test]
    fn dated_commits_are_chronological_with_matching_identities() {
        let mut backend = RecordingBackend::new();
        let now = saturday_noon();
        illustrate(&mut backend, &Matrix::filled(Value::Light), &options(3, now)).unwrap();

        let dated = &backend.commits[..backend.commits.len() - 1];
        assert!(dated.windows(2).all(|w| w[0].author.timestamp <= w[1].author.timestamp));
        for commit in dated {
            assert_eq!(commit.message, "");
            assert_eq!(commit.author, commit.committer);
            assert_eq!(commit.author.name, "name");
            assert_eq!(commit.author.email, "email");
            assert!(commit.author.timestamp <= now);
            assert!(commit.staged.is_empty());
        }
    }

    #[test]
    fn empty_matrix_only_commits_readme() {
        let mut backend = RecordingBackend::new();
        let summary = illustrate(&mut backend, &Matrix::filled(Value::Empty), &options(10, saturday_noon())).unwrap();

        assert_eq!(summary.dated_commits, 0);
        assert_eq!(summary.first_commit, None);
        assert_eq!(backend.commits.len(), 1);
        assert_eq!(backend.commits[0].message, "Added README.md.");
    }

    #[test]
    fn future_cells_are_reported_as_skipped() {
        let mut backend = RecordingBackend::new();
        // Tuesday leaves Wednesday through Saturday of the last column in the future
        let tuesday = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 13, 9, 0, 0)
            .unwrap();
        let summary = illustrate(&mut backend, &Matrix::filled(Value::Light), &options(1, tuesday)).unwrap();

        assert_eq!(summary.cells_skipped, 4);
        assert_eq!(summary.dated_commits, (AREA - 4) as u64);
        assert!(summary.last_commit.unwrap() <= tuesday);
    }

    #[test]
    fn backend_failure_aborts_without_rollback() {
        let mut backend = RecordingBackend::new();
        backend.fail_after = Some(5);
        let err = illustrate(&mut backend, &Matrix::filled(Value::Dark), &options(1, saturday_noon())).unwrap_err();

        assert!(matches!(err, ArtError::Git(_)));
        assert_eq!(backend.commits.len(), 5);
        assert!(!backend.dir.path().join(README_FILE).exists());
    }

    #[test]
    fn backend_failure_abandons_progress_bar() {
        let mut backend = RecordingBackend::new();
        backend.fail_after = Some(5);
        let schedule = Schedule::new(saturday_noon(), 1).unwrap();
        let batches = schedule.plan(&Matrix::filled(Value::Dark), "name", "email").unwrap();
        let mut summary = IllustrationSummary {
            anchor: schedule.anchor(),
            dated_commits: 0,
            cells_committed: 0,
            cells_skipped: 0,
            first_commit: None,
            last_commit: None,
        };
        let pb = ProgressBar::hidden();

        let err = commit_batches(&mut backend, &batches, &mut summary, &pb).unwrap_err();

        assert!(matches!(err, ArtError::Git(_)));
        assert!(pb.is_finished());
        // second cell fails on its third commit
        assert_eq!(pb.position(), 1);
        assert_eq!(pb.message(), format!("Failed at {}", batches[1].date.date_naive()));
        assert_eq!(summary.dated_commits, 3);
        assert_eq!(summary.cells_committed, 1);
    }
}
