use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{GroupError, GroupErrorKind};
use crate::parser::GroupRecord;
use super::slot_utils::{parse_date, parse_time, parse_weekday};
use super::student::Student;
use super::types::{Capacity, ClassType, StudentId, TimeSlot};

/// A single timetable slot of one subject and the students enrolled in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub class_type: ClassType,
    pub teacher: String,
    pub slot: TimeSlot,
    pub room: String,
    pub start_date: NaiveDate,
    pub frequency: u32,
    pub name: String,
    pub capacity: Capacity,
    pub students: Vec<StudentId>,
    pub priority_students: Vec<StudentId>,
}

impl Group {
    /// Creates an empty group with placeholder teacher, room and start date
    pub fn new(
        class_type: ClassType,
        name: impl Into<String>,
        capacity: Capacity,
        slot: TimeSlot,
    ) -> Self {
        Self {
            class_type,
            teacher: String::new(),
            slot,
            room: String::new(),
            start_date: NaiveDate::default(),
            frequency: 1,
            name: name.into(),
            capacity,
            students: Vec::new(),
            priority_students: Vec::new(),
        }
    }

    /// Builds a group from a raw record, validating every typed column
    pub fn from_record(record: &GroupRecord) -> Result<Self, GroupError> {
        let fail = |kind| GroupError {
            subject: record.subject.clone(),
            group: record.group.clone(),
            kind,
        };

        let class_type = ClassType::from_code(&record.class_type)
            .ok_or_else(|| fail(GroupErrorKind::ClassType(record.class_type.clone())))?;
        let weekday = parse_weekday(&record.weekday)
            .ok_or_else(|| fail(GroupErrorKind::Weekday(record.weekday.clone())))?;
        let start = parse_time(&record.start_time).map_err(|source| {
            fail(GroupErrorKind::StartTime {
                value: record.start_time.clone(),
                source,
            })
        })?;
        let end = parse_time(&record.end_time).map_err(|source| {
            fail(GroupErrorKind::EndTime {
                value: record.end_time.clone(),
                source,
            })
        })?;
        let start_date = parse_date(&record.start_date).map_err(|source| {
            fail(GroupErrorKind::StartDate {
                value: record.start_date.clone(),
                source,
            })
        })?;
        let frequency = record.frequency.trim().parse::<u32>().map_err(|source| {
            fail(GroupErrorKind::Frequency {
                value: record.frequency.clone(),
                source,
            })
        })?;
        let capacity = parse_capacity(&record.capacity)
            .ok_or_else(|| fail(GroupErrorKind::Capacity(record.capacity.clone())))?;

        Ok(Self {
            class_type,
            teacher: record.teacher.trim().to_string(),
            slot: TimeSlot::new(weekday, start, end),
            room: record.room.trim().to_string(),
            start_date,
            frequency,
            name: record.group.trim().to_string(),
            capacity,
            students: Vec::new(),
            priority_students: Vec::new(),
        })
    }

    pub fn weekday(&self) -> Weekday {
        self.slot.weekday
    }

    pub fn start_time(&self) -> NaiveTime {
        self.slot.start
    }

    pub fn is_continuation(&self) -> bool {
        self.capacity == Capacity::Continuation
    }

    pub fn occupancy(&self) -> usize {
        self.students.len() + self.priority_students.len()
    }

    /// Number of students above capacity; negative means free seats.
    /// Continuation slots never report a conflict.
    pub fn conflicts(&self) -> i64 {
        match self.capacity {
            Capacity::Seats(seats) => self.occupancy() as i64 - i64::from(seats),
            Capacity::Continuation => 0,
        }
    }

    pub fn contains(&self, student: StudentId) -> bool {
        self.priority_students.contains(&student) || self.students.contains(&student)
    }

    /// Adds a student to the regular or priority roster
    pub fn enroll(&mut self, student: StudentId, priority: bool) {
        if priority {
            self.priority_students.push(student);
        } else {
            self.students.push(student);
        }
    }

    /// Removes a student from the regular roster. Priority students stay put.
    pub fn remove_student(&mut self, student: StudentId) -> bool {
        match self.students.iter().position(|s| *s == student) {
            Some(idx) => {
                self.students.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Sorts the regular roster by overall happiness, happiest first
    pub fn sort_by_happiness(&mut self, students: &[Student]) {
        let happiness = |id: &StudentId| {
            students
                .get(id.0)
                .map(Student::overall_happiness)
                .unwrap_or(0.0)
        };
        self.students
            .sort_by(|a, b| happiness(b).total_cmp(&happiness(a)));
    }

    /// Checks if both groups start at the same weekday and hour
    pub fn collides(&self, other: &Group) -> bool {
        self.slot.collides(&other.slot)
    }
}

fn parse_capacity(value: &str) -> Option<Capacity> {
    match value.trim().parse::<i64>().ok()? {
        -1 => Some(Capacity::Continuation),
        n => u32::try_from(n).ok().map(Capacity::Seats),
    }
}
