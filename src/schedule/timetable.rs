use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GroupError;
use crate::parser::GroupRecord;
use super::group::Group;
use super::subject::Subject;
use super::types::ClassType;

/// All subjects offered in one semester.
/// Subject order is the order in which conflicts get resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub subjects: Vec<Subject>,
}

impl Schedule {
    /// Builds a schedule from group records, keeping record order.
    /// Lecture records go to the subject's lectures, the rest to its groups.
    pub fn from_records(records: &[GroupRecord]) -> Result<Self, GroupError> {
        let mut schedule = Schedule::default();
        for record in records {
            let group = Group::from_record(record)?;
            let subject = schedule.subject_entry(record.subject.trim());
            if group.class_type == ClassType::Lecture {
                subject.lectures.push(group);
            } else {
                subject.groups.push(group);
            }
        }
        debug!(
            subjects = schedule.subjects.len(),
            records = records.len(),
            "built schedule"
        );
        Ok(schedule)
    }

    fn subject_entry(&mut self, name: &str) -> &mut Subject {
        let idx = match self.subjects.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.subjects.push(Subject::new(name));
                self.subjects.len() - 1
            }
        };
        &mut self.subjects[idx]
    }

    pub fn subject(&self, name: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.name == name)
    }

    /// Sorts subjects so the ones without conflicts are resolved first
    pub fn sort_by_conflicts(&mut self) {
        self.subjects.sort_by_key(Subject::conflicts);
    }

    pub fn conflicts(&self) -> u32 {
        self.subjects.iter().map(Subject::conflicts).sum()
    }
}
