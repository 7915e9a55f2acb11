use serde::{Deserialize, Serialize};

use super::group::Group;
use super::types::{Placement, StudentId, TimeSlot};

/// One subject with its lectures and enrollable groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    /// Attended by every student, no capacity limit
    pub lectures: Vec<Group>,
    pub groups: Vec<Group>,
}

impl Subject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lectures: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Names of the groups a student can be placed in, continuation slots excluded
    pub fn group_names(&self) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|g| !g.is_continuation())
            .map(|g| g.name.as_str())
            .collect()
    }

    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.groups
            .iter()
            .position(|g| !g.is_continuation() && g.name == name)
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.group_index(name).map(|idx| &self.groups[idx])
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut Group> {
        let idx = self.group_index(name)?;
        self.groups.get_mut(idx)
    }

    /// Sum of positive group conflicts
    pub fn conflicts(&self) -> u32 {
        self.groups
            .iter()
            .map(|g| g.conflicts().max(0) as u32)
            .sum()
    }

    /// Sorts groups so the most over-capacity group comes first
    pub fn sort_by_conflicts(&mut self) {
        self.groups.sort_by(|a, b| b.conflicts().cmp(&a.conflicts()));
    }

    /// Index of the first enrollable group after `idx`
    pub fn next_enrollable(&self, idx: usize) -> Option<usize> {
        self.groups
            .iter()
            .enumerate()
            .skip(idx + 1)
            .find(|(_, g)| !g.is_continuation())
            .map(|(i, _)| i)
    }

    /// Group the student currently sits in, priority rosters checked first
    pub fn student_group(&self, student: StudentId) -> Option<&Group> {
        self.groups
            .iter()
            .filter(|g| !g.is_continuation())
            .find(|g| g.contains(student))
    }

    /// Every weekly session of a group: its own slot and its continuation slots
    pub fn sessions_of(&self, name: &str) -> Vec<TimeSlot> {
        self.groups
            .iter()
            .filter(|g| g.name == name)
            .map(|g| g.slot)
            .collect()
    }

    pub fn placement_of(&self, student: StudentId) -> Option<Placement> {
        self.student_group(student).map(|g| Placement {
            group: g.name.clone(),
            sessions: self.sessions_of(&g.name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::{Capacity, ClassType};
    use chrono::{NaiveTime, Weekday};

    fn group(name: &str, capacity: Capacity, weekday: Weekday) -> Group {
        let start = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        Group::new(ClassType::Class, name, capacity, TimeSlot::new(weekday, start, start))
    }

    fn filled(name: &str, seats: u32, students: usize) -> Group {
        let mut g = group(name, Capacity::Seats(seats), Weekday::Mon);
        for id in 0..students {
            g.enroll(StudentId(id), false);
        }
        g
    }

    #[test]
    fn test_group_names_skip_continuations() {
        let mut s = Subject::new("Math");
        s.groups.push(group("1", Capacity::Seats(5), Weekday::Mon));
        s.groups.push(group("1", Capacity::Continuation, Weekday::Wed));
        s.groups.push(group("2", Capacity::Seats(5), Weekday::Tue));
        s.groups.push(group("2", Capacity::Continuation, Weekday::Thu));
        assert_eq!(s.group_names(), vec!["1", "2"]);
    }

    #[test]
    fn test_group_lookup() {
        let mut s = Subject::new("Math");
        s.groups.push(group("1", Capacity::Continuation, Weekday::Wed));
        s.groups.push(group("1", Capacity::Seats(5), Weekday::Mon));
        assert!(s.group("2").is_none());
        assert_eq!(s.group_index("1"), Some(1));
        assert_eq!(s.group("1").map(|g| g.weekday()), Some(Weekday::Mon));
        assert_eq!(s.sessions_of("1").len(), 2);
    }

    #[test]
    fn test_conflicts_ignore_free_seats() {
        let mut s = Subject::new("Math");
        s.groups.push(filled("1", 2, 4));
        s.groups.push(filled("2", 5, 1));
        s.groups.push(filled("3", 1, 2));
        assert_eq!(s.conflicts(), 3);
    }

    #[test]
    fn test_sort_by_conflicts_descending() {
        let mut s = Subject::new("Math");
        s.groups.push(filled("1", 5, 1));
        s.groups.push(filled("2", 1, 2));
        s.groups.push(filled("3", 1, 4));
        s.sort_by_conflicts();
        let names: Vec<_> = s.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["3", "2", "1"]);
    }

    #[test]
    fn test_next_enrollable() {
        let mut s = Subject::new("Math");
        s.groups.push(group("1", Capacity::Seats(5), Weekday::Mon));
        s.groups.push(group("1", Capacity::Continuation, Weekday::Wed));
        s.groups.push(group("2", Capacity::Seats(5), Weekday::Tue));
        assert_eq!(s.next_enrollable(0), Some(2));
        assert_eq!(s.next_enrollable(2), None);
    }

    #[test]
    fn test_student_group() {
        let mut s = Subject::new("Math");
        let mut a = group("1", Capacity::Seats(5), Weekday::Mon);
        a.enroll(StudentId(0), true);
        let mut b = group("2", Capacity::Seats(5), Weekday::Tue);
        b.enroll(StudentId(1), false);
        s.groups.push(a);
        s.groups.push(b);

        assert_eq!(s.student_group(StudentId(0)).map(|g| g.name.as_str()), Some("1"));
        assert_eq!(s.student_group(StudentId(1)).map(|g| g.name.as_str()), Some("2"));
        assert!(s.student_group(StudentId(2)).is_none());

        let p = s.placement_of(StudentId(1)).unwrap();
        assert_eq!(p.group, "2");
        assert_eq!(p.sessions.len(), 1);
    }
}
