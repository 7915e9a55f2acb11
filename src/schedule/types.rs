use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Position of a student in the slice handed to the enrollment engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudentId(pub usize);

/// Kind of a scheduled class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassType {
    Class,
    Lecture,
    Laboratory,
}

impl ClassType {
    /// Maps the input code (`C`, `W`, `L`) to a class type
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "C" => Some(ClassType::Class),
            "W" => Some(ClassType::Lecture),
            "L" => Some(ClassType::Laboratory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassType::Class => "Class",
            ClassType::Lecture => "Lecture",
            ClassType::Laboratory => "Laboratory",
        }
    }
}

/// Seat limit of a group.
///
/// A continuation slot is an extra weekly session of a group that is already
/// listed under the same name. It has no seats of its own and is never looked
/// up by name or counted in conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capacity {
    Seats(u32),
    Continuation,
}

impl Capacity {
    pub fn seats(&self) -> Option<u32> {
        match self {
            Capacity::Seats(n) => Some(*n),
            Capacity::Continuation => None,
        }
    }
}

/// Weekday and hours of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub weekday: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn new(weekday: Weekday, start: NaiveTime, end: NaiveTime) -> Self {
        Self { weekday, start, end }
    }

    /// Two sessions collide when they begin on the same weekday at the same time.
    /// End time is not compared.
    pub fn collides(&self, other: &TimeSlot) -> bool {
        self.weekday == other.weekday && self.start == other.start
    }
}

/// The group a student ended up in for one subject, with all its weekly sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub group: String,
    pub sessions: Vec<TimeSlot>,
}

impl Placement {
    pub fn collides_with(&self, sessions: &[TimeSlot]) -> bool {
        self.sessions
            .iter()
            .any(|own| sessions.iter().any(|other| own.collides(other)))
    }
}

/// Residual over-capacity that the repair step could not remove
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortfall {
    pub subject: String,
    pub group: String,
    pub remaining: u32,
}

/// Total conflict of a subject before and after repair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectConflicts {
    pub subject: String,
    pub before: u32,
    pub after: u32,
}

/// Two final groups of one student starting at the same weekday and hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clash {
    pub student: String,
    pub first_subject: String,
    pub first_group: String,
    pub second_subject: String,
    pub second_group: String,
}

/// Outcome of a full enrollment run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrollmentReport {
    pub subjects: Vec<SubjectConflicts>,
    pub shortfalls: Vec<Shortfall>,
    pub moves: usize,
    pub mean_happiness: f64,
    pub clashes: Vec<Clash>,
}

impl EnrollmentReport {
    pub fn is_fully_resolved(&self) -> bool {
        self.shortfalls.is_empty()
    }
}
