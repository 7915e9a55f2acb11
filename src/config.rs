use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Assigns students to class groups from their ranked preferences
#[derive(Debug, Clone, Parser)]
#[command(name = "class-enrollment")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// CSV file with one row per group session
    #[arg(long, env = "ENROLL_GROUPS", default_value = "data/groups.csv")]
    pub groups: PathBuf,

    /// Directory with one preference CSV per student
    #[arg(long, env = "ENROLL_STUDENTS", default_value = "data/students")]
    pub students: PathBuf,

    /// CSV file listing priority students
    #[arg(long, env = "ENROLL_PRIORITY")]
    pub priority: Option<PathBuf>,

    /// Directory for result files
    #[arg(short, long, env = "ENROLL_OUTPUT", default_value = "out")]
    pub output: PathBuf,

    /// Also write a JSON report to this path
    #[arg(long, env = "ENROLL_REPORT")]
    pub report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn students_output(&self) -> PathBuf {
        self.output.join("students")
    }

    pub fn groups_output(&self) -> PathBuf {
        self.output.join("groups.csv")
    }

    /// `RUST_LOG` wins unless verbose output was requested
    pub fn log_filter(&self) -> EnvFilter {
        if self.verbose {
            return EnvFilter::new("debug");
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}
