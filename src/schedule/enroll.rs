use tracing::{debug, info, warn};

use super::move_chain::{apply_move, collect_candidates};
use super::student::{Student, FULL_HAPPINESS};
use super::subject::Subject;
use super::timetable::Schedule;
use super::types::{Clash, EnrollmentReport, Shortfall, StudentId, SubjectConflicts};

/// Places every student in their preferred groups, then repairs over-capacity
/// groups subject by subject.
///
/// `students` is indexed by [`StudentId`]; the schedule and the students are
/// mutated in place and the outcome is summarised in the returned report.
pub fn enroll(schedule: &mut Schedule, students: &mut [Student]) -> EnrollmentReport {
    info!(
        students = students.len(),
        subjects = schedule.subjects.len(),
        "starting enrollment"
    );
    assign(schedule, students);
    schedule.sort_by_conflicts();
    let mut report = resolve(schedule, students);
    report.mean_happiness = mean_happiness(students);
    report.clashes = audit_clashes(students);
    for clash in &report.clashes {
        warn!(
            student = %clash.student,
            first = %clash.first_subject,
            second = %clash.second_subject,
            "final groups start at the same time"
        );
    }
    info!(
        moves = report.moves,
        shortfalls = report.shortfalls.len(),
        mean_happiness = report.mean_happiness,
        "enrollment finished"
    );
    report
}

/// Adds every student to all lectures and to their most wanted group of each subject
pub fn assign(schedule: &mut Schedule, students: &mut [Student]) {
    for (idx, student) in students.iter_mut().enumerate() {
        let id = StudentId(idx);
        for subject in schedule.subjects.iter_mut() {
            for lecture in subject.lectures.iter_mut() {
                lecture.students.push(id);
            }

            let names = subject.group_names();
            // Subject has no groups
            let Some(preferred) = student.preferred_group(&subject.name, &names) else {
                continue;
            };
            let preferred = preferred.to_string();
            if let Some(group) = subject.group_mut(&preferred) {
                group.enroll(id, student.priority);
                student
                    .happiness
                    .insert(subject.name.clone(), FULL_HAPPINESS);
            }
        }
    }
    debug!(conflicts = schedule.conflicts(), "initial assignment done");
}

/// Repairs capacity conflicts in schedule order.
/// Subjects are expected to be sorted by ascending conflict already.
pub fn resolve(schedule: &mut Schedule, students: &mut [Student]) -> EnrollmentReport {
    let mut report = EnrollmentReport::default();
    for subject in schedule.subjects.iter_mut() {
        resolve_subject(subject, students, &mut report);
    }
    report
}

fn resolve_subject(subject: &mut Subject, students: &mut [Student], report: &mut EnrollmentReport) {
    let before = subject.conflicts();
    if before == 0 {
        record_final_groups(subject, students);
        report.subjects.push(SubjectConflicts {
            subject: subject.name.clone(),
            before,
            after: before,
        });
        return;
    }

    info!(subject = %subject.name, conflicts = before, "resolving subject");
    subject.sort_by_conflicts();
    for group in subject.groups.iter_mut() {
        group.sort_by_happiness(students);
    }

    for idx in 0..subject.groups.len() {
        let conflicts = subject.groups[idx].conflicts();
        if conflicts <= 0 {
            continue;
        }
        let mut remaining = conflicts as u32;

        if let Some(target) = subject.next_enrollable(idx) {
            let mut candidates = collect_candidates(subject, idx, target, students);
            if candidates.is_empty() {
                debug!(subject = %subject.name, group = %subject.groups[idx].name, "no movable students");
            } else {
                debug!(
                    subject = %subject.name,
                    group = %subject.groups[idx].name,
                    liked = candidates.liked.len(),
                    total = candidates.len(),
                    "collected candidates"
                );
            }
            while remaining > 0 {
                let Some((mv, recalculate)) = candidates.pop() else {
                    break;
                };
                if !apply_move(&mv, subject) {
                    continue;
                }
                if recalculate {
                    if let Some(student) = students.get_mut(mv.student.0) {
                        student.recalculate_happiness(&subject.name);
                    }
                }
                debug!(
                    subject = %subject.name,
                    student = mv.student.0,
                    from = %subject.groups[mv.from_group].name,
                    to = %subject.groups[mv.to_group].name,
                    recalculate,
                    "moved student"
                );
                report.moves += 1;
                remaining -= 1;
            }
        }

        if remaining > 0 {
            let group = subject.groups[idx].name.clone();
            warn!(
                subject = %subject.name,
                group = %group,
                remaining,
                "could not bring group within capacity"
            );
            report.shortfalls.push(Shortfall {
                subject: subject.name.clone(),
                group,
                remaining,
            });
        }
    }

    record_final_groups(subject, students);
    report.subjects.push(SubjectConflicts {
        subject: subject.name.clone(),
        before,
        after: subject.conflicts(),
    });
}

/// Fixes every student's group for this subject so later subjects see it
fn record_final_groups(subject: &Subject, students: &mut [Student]) {
    for (idx, student) in students.iter_mut().enumerate() {
        student
            .final_groups
            .insert(subject.name.clone(), subject.placement_of(StudentId(idx)));
    }
}

/// Mean overall happiness of students who are not priority students
pub fn mean_happiness(students: &[Student]) -> f64 {
    let regular: Vec<f64> = students
        .iter()
        .filter(|s| !s.priority)
        .map(Student::overall_happiness)
        .collect();
    if regular.is_empty() {
        return 0.0;
    }
    regular.iter().sum::<f64>() / regular.len() as f64
}

/// Lists pairs of final groups of one student that start at the same weekday and hour
pub fn audit_clashes(students: &[Student]) -> Vec<Clash> {
    let mut clashes = Vec::new();
    for student in students {
        let placed: Vec<_> = student
            .final_groups
            .iter()
            .filter_map(|(subject, p)| p.as_ref().map(|p| (subject, p)))
            .collect();
        for (i, (first_subject, first)) in placed.iter().enumerate() {
            for (second_subject, second) in &placed[i + 1..] {
                if first.collides_with(&second.sessions) {
                    clashes.push(Clash {
                        student: student.name.clone(),
                        first_subject: first_subject.to_string(),
                        first_group: first.group.clone(),
                        second_subject: second_subject.to_string(),
                        second_group: second.group.clone(),
                    });
                }
            }
        }
    }
    clashes
}
