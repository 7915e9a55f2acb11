use std::collections::{BTreeMap, VecDeque};

use super::student::Student;
use super::subject::Subject;
use super::types::{Placement, StudentId, TimeSlot};

/// A planned move of one regular student between two groups of a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub student: StudentId,
    pub from_group: usize,
    pub to_group: usize,
}

/// Candidates for one over-capacity group, consumed head first
#[derive(Debug, Default)]
pub struct Candidates {
    /// Students who ranked the target group first; moving them costs nothing
    pub liked: VecDeque<Move>,
    /// Students who can move but did not rank the target first
    pub other: VecDeque<Move>,
}

impl Candidates {
    /// Takes the next move; the flag tells whether happiness has to be recalculated
    pub fn pop(&mut self) -> Option<(Move, bool)> {
        if let Some(mv) = self.liked.pop_front() {
            return Some((mv, false));
        }
        self.other.pop_front().map(|mv| (mv, true))
    }

    pub fn len(&self) -> usize {
        self.liked.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A student may move into `target` unless one of the groups already finalised
/// for them (other than `subject`) starts at the same weekday and hour.
pub fn can_move(
    finalized: &BTreeMap<String, Option<Placement>>,
    subject: &str,
    target: &[TimeSlot],
) -> bool {
    finalized
        .iter()
        .filter(|(name, _)| name.as_str() != subject)
        .filter_map(|(_, placement)| placement.as_ref())
        .all(|placement| !placement.collides_with(target))
}

/// Splits the regular students of group `from_group` that can move to
/// `to_group` into those who like the target and those who don't.
/// Roster order is kept, so the happiest students come first once the roster is sorted.
pub fn collect_candidates(
    subject: &Subject,
    from_group: usize,
    to_group: usize,
    students: &[Student],
) -> Candidates {
    let mut candidates = Candidates::default();
    let (Some(from), Some(to)) = (subject.groups.get(from_group), subject.groups.get(to_group)) else {
        return candidates;
    };
    let target_sessions = subject.sessions_of(&to.name);

    for &id in &from.students {
        let Some(student) = students.get(id.0) else {
            continue;
        };
        if !student.can_move(&subject.name, &target_sessions) {
            continue;
        }
        let mv = Move {
            student: id,
            from_group,
            to_group,
        };
        if student.likes(&subject.name, &to.name) {
            candidates.liked.push_back(mv);
        } else {
            candidates.other.push_back(mv);
        }
    }
    candidates
}

/// Applies a move to the subject's rosters.
/// The target's capacity is not checked; an overfilled target is repaired when its turn comes.
pub fn apply_move(mv: &Move, subject: &mut Subject) -> bool {
    let removed = subject
        .groups
        .get_mut(mv.from_group)
        .map(|g| g.remove_student(mv.student))
        .unwrap_or(false);
    if !removed {
        return false;
    }
    match subject.groups.get_mut(mv.to_group) {
        Some(target) => {
            target.students.push(mv.student);
            true
        }
        None => {
            // put the student back where they were
            if let Some(source) = subject.groups.get_mut(mv.from_group) {
                source.students.push(mv.student);
            }
            false
        }
    }
}
