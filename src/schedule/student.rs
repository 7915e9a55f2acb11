use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{StudentError, StudentErrorKind};
use crate::parser::PreferenceRecord;
use super::move_chain::can_move;
use super::preference::PreferenceTable;
use super::types::{Placement, TimeSlot};

/// Happiness of a student placed in a group they ranked first
pub const FULL_HAPPINESS: f64 = 100.0;

/// A student with their group preferences and enrollment outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub priority: bool,
    pub preferences: PreferenceTable,
    /// Happiness per subject, set once the student is placed
    pub happiness: BTreeMap<String, f64>,
    /// Final group per resolved subject; `None` when the subject has no groups
    pub final_groups: BTreeMap<String, Option<Placement>>,
}

impl Student {
    /// Builds a student from preference records and validates the ranks
    pub fn new(name: impl Into<String>, records: &[PreferenceRecord]) -> Result<Self, StudentError> {
        let name = name.into();
        let fail = |kind| StudentError {
            name: name.clone(),
            kind,
        };

        let mut preferences = PreferenceTable::new();
        for record in records {
            let rank: i64 = record.rank.trim().parse().map_err(|source| {
                fail(StudentErrorKind::Rank {
                    subject: record.subject.clone(),
                    group: record.group.clone(),
                    value: record.rank.clone(),
                    source,
                })
            })?;
            let rank = u32::try_from(rank)
                .ok()
                .filter(|r| *r >= 1)
                .ok_or_else(|| {
                    fail(StudentErrorKind::RankOutOfRange {
                        subject: record.subject.clone(),
                        group: record.group.clone(),
                        value: rank,
                    })
                })?;
            preferences.insert(record.subject.trim(), record.group.trim(), rank);
        }
        preferences.validate().map_err(fail)?;

        Ok(Self::with_preferences(name, preferences))
    }

    /// Builds a student from an already assembled preference table
    pub fn with_preferences(name: impl Into<String>, preferences: PreferenceTable) -> Self {
        Self {
            name: name.into(),
            priority: false,
            preferences,
            happiness: BTreeMap::new(),
            final_groups: BTreeMap::new(),
        }
    }

    /// Picks the most wanted group among `groups`; ties go to the first listed.
    /// Groups without a rank are less wanted than any ranked group.
    pub fn preferred_group<'a>(&self, subject: &str, groups: &[&'a str]) -> Option<&'a str> {
        groups
            .iter()
            .copied()
            .min_by_key(|g| self.preferences.rank(subject, g).unwrap_or(u32::MAX))
    }

    /// A student likes a group they ranked first
    pub fn likes(&self, subject: &str, group: &str) -> bool {
        self.preferences.rank(subject, group) == Some(1)
    }

    /// Checks the target sessions against every group already finalised for the student
    pub fn can_move(&self, subject: &str, target: &[TimeSlot]) -> bool {
        can_move(&self.final_groups, subject, target)
    }

    /// Mean happiness over all subjects the student was placed in
    pub fn overall_happiness(&self) -> f64 {
        if self.happiness.is_empty() {
            return 0.0;
        }
        self.happiness.values().sum::<f64>() / self.happiness.len() as f64
    }

    /// Happiness after being moved away from the preferred group
    pub fn recalculate_happiness(&mut self, subject: &str) {
        let distinct = self.preferences.distinct_ranks(subject).len();
        let value = if distinct <= 1 {
            FULL_HAPPINESS
        } else {
            FULL_HAPPINESS / distinct as f64
        };
        self.happiness.insert(subject.to_string(), value);
    }

    pub fn final_group(&self, subject: &str) -> Option<&Placement> {
        self.final_groups.get(subject)?.as_ref()
    }

    /// (subject, group) rows of the final timetable, skipping subjects without groups
    pub fn results(&self) -> Vec<(String, String)> {
        self.final_groups
            .iter()
            .filter_map(|(subject, placement)| {
                placement
                    .as_ref()
                    .map(|p| (subject.clone(), p.group.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};

    fn rec(subject: &str, group: &str, rank: &str) -> PreferenceRecord {
        PreferenceRecord {
            subject: subject.into(),
            group: group.into(),
            rank: rank.into(),
        }
    }

    fn with_ranks(entries: &[(&str, &str, u32)]) -> Student {
        let mut prefs = PreferenceTable::new();
        for (subject, group, rank) in entries {
            prefs.insert(*subject, *group, *rank);
        }
        Student::with_preferences("student", prefs)
    }

    fn placement(group: &str, weekday: Weekday, h: u32, m: u32) -> Option<Placement> {
        let start = NaiveTime::from_hms_opt(h, m, 0).unwrap();
        Some(Placement {
            group: group.into(),
            sessions: vec![TimeSlot::new(weekday, start, start)],
        })
    }

    #[test]
    fn test_new_student() {
        let s = Student::new(
            "student",
            &[
                rec("subject1", "g1", "1"),
                rec("subject1", "g2", "1"),
                rec("subject2", "g1", "1"),
                rec("subject2", "g2", "2"),
            ],
        )
        .unwrap();
        assert_eq!(s.name, "student");
        assert!(!s.priority);
        assert_eq!(s.preferences.rank("subject2", "g2"), Some(2));
        assert!(s.happiness.is_empty());
        assert!(s.final_groups.is_empty());
    }

    #[test]
    fn test_new_student_rejects_bad_rank() {
        let err = Student::new("student", &[rec("subject1", "g1", "wrong")]).unwrap_err();
        assert_eq!(err.name, "student");
        assert!(matches!(err.kind, StudentErrorKind::Rank { ref value, .. } if value == "wrong"));

        let err = Student::new("student", &[rec("subject1", "g1", "-1")]).unwrap_err();
        assert!(matches!(err.kind, StudentErrorKind::RankOutOfRange { value: -1, .. }));
    }

    #[test]
    fn test_new_student_rejects_invalid_sequence() {
        let err = Student::new(
            "student",
            &[rec("subject1", "g1", "1"), rec("subject1", "g2", "3")],
        )
        .unwrap_err();
        assert_eq!(
            err.kind,
            StudentErrorKind::RankGap {
                subject: "subject1".into(),
                previous: 1,
                next: 3
            }
        );
    }

    #[test]
    fn test_preferred_group() {
        let s = with_ranks(&[("Math", "1", 2), ("Math", "2", 1), ("Math", "3", 3)]);
        assert_eq!(s.preferred_group("Math", &["1", "2", "3"]), Some("2"));
    }

    #[test]
    fn test_preferred_group_ties_go_to_first() {
        let s = with_ranks(&[("Math", "1", 2), ("Math", "2", 1), ("Math", "3", 1)]);
        assert_eq!(s.preferred_group("Math", &["3", "1", "2"]), Some("3"));
        assert_eq!(s.preferred_group("Math", &["1", "2", "3"]), Some("2"));
    }

    #[test]
    fn test_preferred_group_unranked() {
        let s = with_ranks(&[("Math", "2", 1)]);
        assert_eq!(s.preferred_group("Math", &["1", "2"]), Some("2"));
        assert_eq!(s.preferred_group("Physics", &["a", "b"]), Some("a"));
        assert_eq!(s.preferred_group("Physics", &[]), None);
    }

    #[test]
    fn test_likes() {
        let s = with_ranks(&[("Math", "1", 1), ("Math", "2", 2)]);
        assert!(s.likes("Math", "1"));
        assert!(!s.likes("Math", "2"));
        assert!(!s.likes("Math", "3"));
    }

    #[test]
    fn test_can_move() {
        let mut s = with_ranks(&[]);
        s.final_groups.insert("Math2.0".into(), placement("1", Weekday::Fri, 12, 30));
        s.final_groups.insert("Programming".into(), placement("2", Weekday::Mon, 14, 0));
        s.final_groups.insert("Sports".into(), None);

        let start = NaiveTime::from_hms_opt(12, 30, 0).unwrap();
        let target = [TimeSlot::new(Weekday::Mon, start, start)];
        assert!(s.can_move("Math", &target));

        s.final_groups.insert("Programming".into(), placement("2", Weekday::Mon, 12, 30));
        assert!(!s.can_move("Math", &target));
    }

    #[test]
    fn test_overall_happiness() {
        let mut s = with_ranks(&[]);
        assert_eq!(s.overall_happiness(), 0.0);
        s.happiness.insert("Math".into(), 100.0);
        s.happiness.insert("Programming".into(), 50.0);
        s.happiness.insert("Algorithms".into(), 25.0);
        assert_eq!(s.overall_happiness(), (100.0 + 50.0 + 25.0) / 3.0);
    }

    #[test]
    fn test_recalculate_happiness() {
        let mut s = with_ranks(&[("Math", "1", 1), ("Math", "2", 2), ("Math", "3", 3)]);
        s.recalculate_happiness("Math");
        assert_eq!(s.happiness.get("Math"), Some(&(100.0 / 3.0)));
    }

    #[test]
    fn test_recalculate_happiness_uniform_ranks() {
        let mut s = with_ranks(&[("Math", "1", 1), ("Math", "2", 1)]);
        s.recalculate_happiness("Math");
        assert_eq!(s.happiness.get("Math"), Some(&100.0));
    }

    #[test]
    fn test_results_skip_subjects_without_groups() {
        let mut s = with_ranks(&[]);
        s.final_groups.insert("Math".into(), placement("1", Weekday::Mon, 8, 0));
        s.final_groups.insert("Programming".into(), placement("2a", Weekday::Tue, 8, 0));
        s.final_groups.insert("Algorithms".into(), None);
        assert_eq!(
            s.results(),
            vec![
                ("Math".to_string(), "1".to_string()),
                ("Programming".to_string(), "2a".to_string()),
            ]
        );
        assert_eq!(s.final_group("Math").map(|p| p.group.as_str()), Some("1"));
        assert!(s.final_group("Algorithms").is_none());
    }
}
