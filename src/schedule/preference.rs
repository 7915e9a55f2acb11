use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::StudentErrorKind;

/// Ranks a student gave to the groups of each subject, 1 = most preferred
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceTable {
    ranks: HashMap<String, HashMap<String, u32>>,
}

impl PreferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a rank; a later rank for the same pair replaces the earlier one
    pub fn insert(&mut self, subject: impl Into<String>, group: impl Into<String>, rank: u32) {
        self.ranks
            .entry(subject.into())
            .or_default()
            .insert(group.into(), rank);
    }

    pub fn rank(&self, subject: &str, group: &str) -> Option<u32> {
        self.ranks.get(subject)?.get(group).copied()
    }

    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.ranks.keys().map(String::as_str)
    }

    /// Sorted distinct ranks given for a subject
    pub fn distinct_ranks(&self, subject: &str) -> BTreeSet<u32> {
        self.ranks
            .get(subject)
            .map(|groups| groups.values().copied().collect())
            .unwrap_or_default()
    }

    /// Checks that, per subject, the distinct ranks start at 1 and have no gaps
    pub fn validate(&self) -> Result<(), StudentErrorKind> {
        let mut subjects: Vec<&str> = self.subjects().collect();
        subjects.sort_unstable();
        for subject in subjects {
            validate_ranks(subject, &self.distinct_ranks(subject))?;
        }
        Ok(())
    }
}

fn validate_ranks(subject: &str, ranks: &BTreeSet<u32>) -> Result<(), StudentErrorKind> {
    let mut iter = ranks.iter().copied();
    let Some(first) = iter.next() else {
        return Ok(());
    };
    if first != 1 {
        return Err(StudentErrorKind::FirstRankNotOne {
            subject: subject.to_string(),
            lowest: first,
        });
    }
    let mut previous = first;
    for next in iter {
        if next - previous > 1 {
            return Err(StudentErrorKind::RankGap {
                subject: subject.to_string(),
                previous,
                next,
            });
        }
        previous = next;
    }
    Ok(())
}
