//! Simulation runs.

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use schola_concurrency::{JournalStats, School};
use schola_core::{RunSummary, SimulationConfig};

use super::config::warn_if_unattainable;

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Path to a TOML configuration file
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Number of classrooms (and teachers)
    #[clap(long)]
    pub classrooms: Option<usize>,

    /// Students per classroom
    #[clap(long)]
    pub students_per_classroom: Option<usize>,

    /// Enrolled students needed to start a lesson
    #[clap(long)]
    pub quorum: Option<usize>,

    /// Lessons every actor must complete
    #[clap(long)]
    pub lessons: Option<u32>,

    /// Lesson duration in milliseconds
    #[clap(long)]
    pub lesson_ms: Option<u64>,

    /// Break between lessons in milliseconds
    #[clap(long)]
    pub recess_ms: Option<u64>,

    /// Bound on every blocking wait in milliseconds
    #[clap(long)]
    pub wait_ms: Option<u64>,

    /// Number of consecutive runs
    #[clap(long, default_value_t = 1)]
    pub runs: u32,

    /// Print one JSON object per run instead of the text summary
    #[clap(long)]
    pub json: bool,

    /// Audit the transition journal and the final records
    #[clap(long)]
    pub verify: bool,
}

impl RunArgs {
    /// Defaults, then the configuration file, then the flags.
    pub fn resolve(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_file(path)
                .with_context(|| format!("invalid configuration in {}", path.display()))?,
            None => SimulationConfig::default(),
        };

        if let Some(classrooms) = self.classrooms {
            config.classrooms = classrooms;
        }
        if let Some(students) = self.students_per_classroom {
            config.students_per_classroom = students;
        }
        if let Some(quorum) = self.quorum {
            config.quorum = quorum;
        }
        if let Some(lessons) = self.lessons {
            config.required_lessons = lessons;
        }
        if let Some(ms) = self.lesson_ms {
            config.lesson_duration_ms = ms;
        }
        if let Some(ms) = self.recess_ms {
            config.recess_ms = ms;
        }
        if let Some(ms) = self.wait_ms {
            config.wait_timeout_ms = ms;
        }

        config.validate()?;
        Ok(config)
    }
}

/// One line of `--json` output.
#[derive(Debug, Serialize)]
struct RunReport {
    run: u32,
    elapsed_ms: f64,
    summary: RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    journal: Option<JournalStats>,
}

/// Implementation of the run command
pub fn execute(args: &RunArgs) -> Result<()> {
    if args.runs == 0 {
        bail!("--runs must be at least 1");
    }
    let config = args.resolve()?;
    warn_if_unattainable(&config);

    let mut fully_completed = 0;
    let mut completion_total = 0.0;

    for run in 1..=args.runs {
        let outcome = School::with_config(config.clone())?
            .run()
            .with_context(|| format!("run {} failed", run))?;
        info!(run, elapsed_ms = outcome.elapsed.as_secs_f64() * 1000.0, "run finished");

        let journal = if args.verify {
            Some(
                outcome
                    .verify()
                    .with_context(|| format!("run {} failed verification", run))?,
            )
        } else {
            None
        };

        let summary = outcome.summary();
        if summary.fully_completed() {
            fully_completed += 1;
        }
        completion_total += summary.student_completion();

        if args.json {
            let report = RunReport {
                run,
                elapsed_ms: outcome.elapsed.as_secs_f64() * 1000.0,
                summary,
                journal,
            };
            println!("{}", serde_json::to_string(&report)?);
        } else {
            if args.runs > 1 {
                println!("Run {}/{}", run, args.runs);
            }
            print!("{}", summary);
            if let Some(stats) = journal {
                println!(
                    "Journal verified: {} lessons ({} below quorum), {} classrooms closed",
                    stats.lessons, stats.degraded, stats.closed
                );
            }
            println!();
        }
    }

    if args.runs > 1 && !args.json {
        println!(
            "{}/{} runs fully completed; average student completion {:.1}%",
            fully_completed,
            args.runs,
            completion_total / f64::from(args.runs)
        );
    }
    Ok(())
}
