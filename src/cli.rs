use crate::git::GitRepo;
use crate::illustrate::{illustrate, IllustrateOptions};
use crate::matrix::Matrix;
use crate::output;
use crate::schedule::Schedule;
use crate::util::parse_anchor;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "contribution-art")]
#[command(about = "Draw artwork on a contribution calendar by generating backdated git commits")]
#[command(version)]
pub struct Cli {
    #[arg(short = 'm', long, help = "Matrix definition path")]
    pub matrix: PathBuf,

    #[arg(short = 'r', long, help = "Repository path", required_unless_present = "dry_run")]
    pub repo: Option<PathBuf>,

    #[arg(short = 'f', long, help = "Scaling factor", default_value_t = 10)]
    pub factor: u32,

    #[arg(short = 'n', long, help = "User name", default_value = "")]
    pub name: String,

    #[arg(short = 'e', long, help = "Email address", default_value = "")]
    pub email: String,

    #[arg(long, help = "Render against this date instead of now (RFC3339, YYYY-MM-DD, or 'N days ago')")]
    pub date: Option<String>,

    #[arg(long, help = "Print the commit schedule without touching a repository")]
    pub dry_run: bool,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,

    #[arg(long, help = "Output as NDJSON (dry run only)", requires = "dry_run", conflicts_with = "json")]
    pub ndjson: bool,

    #[arg(long, help = "Hide the progress bar")]
    pub no_progress: bool,

    #[arg(short = 'v', long, help = "Enable debug logging")]
    pub verbose: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        init_logging(self.verbose);

        let matrix = Matrix::from_path(&self.matrix)
            .with_context(|| format!("Failed to load matrix definition '{}'", self.matrix.display()))?;
        let now = self.anchor()?;

        if self.dry_run {
            return self.print_schedule(&matrix, now);
        }

        let Some(repo_path) = self.repo.as_ref() else {
            anyhow::bail!("--repo is required unless --dry-run is given");
        };
        let mut repo = GitRepo::init(repo_path)
            .with_context(|| format!("Failed to initialize git repository at '{}'", repo_path.display()))?;

        let options = IllustrateOptions {
            factor: self.factor,
            name: self.name.clone(),
            email: self.email.clone(),
            now,
            show_progress: !self.no_progress && !self.json,
        };
        let summary = illustrate(&mut repo, &matrix, &options).context("Failed to illustrate matrix")?;

        let out = output::illustrate_output(&summary, repo.path(), &self.matrix, self.factor);
        if self.json {
            output::output_illustrate_json(&out)?;
        } else {
            output::output_illustrate_summary(&out)?;
        }
        Ok(())
    }

    fn anchor(&self) -> Result<DateTime<FixedOffset>> {
        let now = Utc::now().fixed_offset();
        match self.date.as_deref() {
            Some(input) => parse_anchor(input, now).context("Failed to resolve --date"),
            None => Ok(now),
        }
    }

    fn print_schedule(&self, matrix: &Matrix, now: DateTime<FixedOffset>) -> Result<()> {
        let schedule = Schedule::new(now, self.factor).context("Failed to anchor schedule")?;
        let batches = schedule
            .plan(matrix, &self.name, &self.email)
            .context("Failed to plan commits")?;

        if self.json {
            output::output_schedule_json(&output::schedule_output(&schedule, &batches, &self.matrix))
        } else if self.ndjson {
            output::output_schedule_ndjson(&batches)
        } else {
            output::output_schedule_summary(&output::schedule_output(&schedule, &batches, &self.matrix), matrix)
        }
    }
}

/// Install the stderr subscriber; `RUST_LOG` may name a level, `--verbose` forces debug.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else {
        std::env::var("RUST_LOG")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Level::WARN)
    };

    let _ = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
