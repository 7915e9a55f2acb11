use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Returned when a group record cannot be turned into a [`Group`](crate::schedule::Group).
#[derive(Debug, Error, PartialEq)]
#[error("failed to create group {group:?} of subject {subject:?}: {kind}")]
pub struct GroupError {
    pub subject: String,
    pub group: String,
    pub kind: GroupErrorKind,
}

#[derive(Debug, Error, PartialEq)]
pub enum GroupErrorKind {
    #[error("incorrect class type {0:?}, available types: C - Class, W - Lecture, L - Laboratory")]
    ClassType(String),
    #[error("incorrect weekday {0:?}, available weekdays: Monday, Tuesday, Wednesday, Thursday, Friday")]
    Weekday(String),
    #[error("incorrect start time {value:?}: {source}")]
    StartTime {
        value: String,
        source: chrono::ParseError,
    },
    #[error("incorrect end time {value:?}: {source}")]
    EndTime {
        value: String,
        source: chrono::ParseError,
    },
    #[error("incorrect start date {value:?}: {source}")]
    StartDate {
        value: String,
        source: chrono::ParseError,
    },
    #[error("incorrect frequency {value:?}: {source}")]
    Frequency {
        value: String,
        source: ParseIntError,
    },
    #[error("incorrect capacity {0:?}, expected a non-negative number or -1")]
    Capacity(String),
}

/// Returned when a student's preference records are malformed.
#[derive(Debug, Error, PartialEq)]
#[error("failed to create student {name:?}: {kind}")]
pub struct StudentError {
    pub name: String,
    pub kind: StudentErrorKind,
}

#[derive(Debug, Error, PartialEq)]
pub enum StudentErrorKind {
    #[error("rank {value:?} for group {group:?} of {subject:?} is not a number: {source}")]
    Rank {
        subject: String,
        group: String,
        value: String,
        source: ParseIntError,
    },
    #[error("rank {value} for group {group:?} of {subject:?} must be a positive integer")]
    RankOutOfRange {
        subject: String,
        group: String,
        value: i64,
    },
    #[error("ranks for {subject:?} must start at 1, lowest given is {lowest}")]
    FirstRankNotOne { subject: String, lowest: u32 },
    #[error("ranks for {subject:?} skip from {previous} to {next}")]
    RankGap {
        subject: String,
        previous: u32,
        next: u32,
    },
}

/// Errors raised while reading input records.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: record has {found} columns, expected {expected}")]
    ShortRecord {
        line: u64,
        found: usize,
        expected: usize,
    },
    #[error(transparent)]
    Group(#[from] GroupError),
    #[error(transparent)]
    Student(#[from] StudentError),
    #[error("missing {0} student")]
    UnknownPriorityStudent(String),
    #[error("student {name:?} from {} is already loaded from another file", path.display())]
    DuplicateStudent { name: String, path: PathBuf },
    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        source: Box<LoadError>,
    },
}

impl LoadError {
    pub(crate) fn in_file(path: impl Into<PathBuf>, source: LoadError) -> Self {
        LoadError::InFile {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

/// Errors raised while writing results.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
