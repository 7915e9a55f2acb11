//! Enrollment of university students into class groups.
//!
//! Students rank the groups of every subject. [`schedule::enroll()`] first puts
//! each student in their most wanted group, then moves students between
//! groups until every group fits its capacity or no acceptable move is left.
//! The [`parser`] and [`display`] modules read the inputs from CSV and write
//! the results back.

pub mod config;
pub mod display;
pub mod error;
pub mod parser;
pub mod schedule;

pub use error::{GroupError, LoadError, StudentError, WriteError};
pub use schedule::{enroll, EnrollmentReport, Schedule, Student};
