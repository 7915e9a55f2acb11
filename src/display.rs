use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use csv::Writer;
use serde::Serialize;
use tracing::info;

use crate::error::WriteError;
use crate::schedule::slot_utils::{format_time, weekday_name};
use crate::schedule::{EnrollmentReport, Group, Schedule, Student};

/// Per-student part of the JSON report
#[derive(Debug, Serialize)]
pub struct StudentSummary<'a> {
    pub name: &'a str,
    pub priority: bool,
    pub happiness: &'a BTreeMap<String, f64>,
    pub overall_happiness: f64,
    pub groups: BTreeMap<&'a str, Option<&'a str>>,
}

#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    report: &'a EnrollmentReport,
    students: Vec<StudentSummary<'a>>,
}

pub fn summarize(student: &Student) -> StudentSummary<'_> {
    StudentSummary {
        name: &student.name,
        priority: student.priority,
        happiness: &student.happiness,
        overall_happiness: student.overall_happiness(),
        groups: student
            .final_groups
            .iter()
            .map(|(subject, p)| (subject.as_str(), p.as_ref().map(|p| p.group.as_str())))
            .collect(),
    }
}

/// Writes one student's final groups as `subject,group` rows
pub fn write_student_results<W: Write>(writer: W, student: &Student) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["subject", "group"])?;
    for (subject, group) in student.results() {
        wtr.write_record([subject, group])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `<dir>/<student>.csv` for every student
pub fn write_all_student_results(dir: &Path, students: &[Student]) -> Result<(), WriteError> {
    fs::create_dir_all(dir).map_err(|source| WriteError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for student in students {
        let path = dir.join(format!("{}.csv", student.name));
        let file = File::create(&path).map_err(|source| WriteError::Io {
            path: path.clone(),
            source,
        })?;
        write_student_results(file, student).map_err(|source| WriteError::Csv { path, source })?;
    }
    info!(path = %dir.display(), students = students.len(), "wrote student results");
    Ok(())
}

fn roster(group: &Group, students: &[Student]) -> String {
    group
        .priority_students
        .iter()
        .chain(group.students.iter())
        .filter_map(|id| students.get(id.0))
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(";")
}

/// Writes one row per lecture and group with its roster
pub fn write_group_rosters<W: Write>(
    writer: W,
    schedule: &Schedule,
    students: &[Student],
) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record([
        "subject", "group", "type", "weekday", "start", "end", "room", "capacity", "enrolled",
        "priority", "students",
    ])?;
    for subject in &schedule.subjects {
        for group in subject.lectures.iter().chain(subject.groups.iter()) {
            let capacity = match group.capacity.seats() {
                Some(seats) => seats.to_string(),
                None => "-1".to_string(),
            };
            wtr.write_record([
                subject.name.clone(),
                group.name.clone(),
                group.class_type.as_str().to_string(),
                weekday_name(group.weekday()).to_string(),
                format_time(group.slot.start),
                format_time(group.slot.end),
                group.room.clone(),
                capacity,
                group.occupancy().to_string(),
                group.priority_students.len().to_string(),
                roster(group, students),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_group_rosters_file(
    path: &Path,
    schedule: &Schedule,
    students: &[Student],
) -> Result<(), WriteError> {
    let file = File::create(path).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_group_rosters(file, schedule, students).map_err(|source| WriteError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "wrote group rosters");
    Ok(())
}

pub fn report_json(report: &EnrollmentReport, students: &[Student]) -> Result<String, WriteError> {
    let doc = ReportDocument {
        report,
        students: students.iter().map(summarize).collect(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

pub fn write_report_json(
    path: &Path,
    report: &EnrollmentReport,
    students: &[Student],
) -> Result<(), WriteError> {
    let json = report_json(report, students)?;
    fs::write(path, json).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "wrote report");
    Ok(())
}

/// Prints the outcome of an enrollment run
pub fn print_summary(report: &EnrollmentReport) {
    println!("\n=== Enrollment Summary ===");
    println!("Students happiness: {:.2}", report.mean_happiness);
    println!("Students moved: {}", report.moves);

    println!("\nConflicts per subject (before -> after):");
    for s in &report.subjects {
        println!("  {} : {} -> {}", s.subject, s.before, s.after);
    }

    if report.is_fully_resolved() {
        println!("\nAll groups within capacity");
    } else {
        println!("\n⚠️  Groups still over capacity ({}):", report.shortfalls.len());
        for s in &report.shortfalls {
            println!("  - {} / {} : {} too many", s.subject, s.group, s.remaining);
        }
    }

    if !report.clashes.is_empty() {
        println!("\n⚠️  Timetable clashes ({}):", report.clashes.len());
        for c in &report.clashes {
            println!(
                "  - {} : {} ({}) and {} ({})",
                c.student, c.first_subject, c.first_group, c.second_subject, c.second_group
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{enroll, Capacity, ClassType, PreferenceTable, Subject, TimeSlot};
    use chrono::{NaiveTime, Weekday};
    use tempfile::TempDir;

    fn setup() -> (Schedule, Vec<Student>, EnrollmentReport) {
        let start = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(15, 30, 0).unwrap();
        let slot = TimeSlot::new(Weekday::Mon, start, end);
        let mut math = Subject::new("Math");
        math.lectures.push(Group::new(ClassType::Lecture, "w1", Capacity::Seats(0), slot));
        math.groups.push(Group::new(ClassType::Class, "1", Capacity::Seats(1), slot));
        let mut sports = Subject::new("Sports");
        sports.lectures.push(Group::new(ClassType::Lecture, "w", Capacity::Seats(0), slot));
        let mut schedule = Schedule {
            subjects: vec![math, sports],
        };

        let mut prefs = PreferenceTable::new();
        prefs.insert("Math", "1", 1);
        let mut students = vec![
            Student::with_preferences("anna", prefs.clone()),
            Student::with_preferences("bob", prefs),
        ];
        students[1].priority = true;
        let report = enroll(&mut schedule, &mut students);
        (schedule, students, report)
    }

    #[test]
    fn test_write_student_results() {
        let (_, students, _) = setup();
        let mut out = Vec::new();
        write_student_results(&mut out, &students[0]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "subject,group\nMath,1\n");
    }

    #[test]
    fn test_write_group_rosters() {
        let (schedule, students, _) = setup();
        let mut out = Vec::new();
        write_group_rosters(&mut out, &schedule, &students).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines.contains(&"Math,1,Class,Monday,14:00,15:30,,1,2,1,bob;anna"));
        assert!(lines.contains(&"Sports,w,Lecture,Monday,14:00,15:30,,0,2,0,anna;bob"));
    }

    #[test]
    fn test_report_json() {
        let (_, students, report) = setup();
        let json = report_json(&report, &students).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["report"]["shortfalls"][0]["group"], "1");
        assert_eq!(value["report"]["shortfalls"][0]["remaining"], 1);
        assert_eq!(value["students"][0]["name"], "anna");
        assert_eq!(value["students"][0]["groups"]["Math"], "1");
        assert!(value["students"][0]["groups"]["Sports"].is_null());
        assert_eq!(value["students"][1]["priority"], true);
    }

    #[test]
    fn test_write_all_student_results_to_dir() {
        let (_, students, _) = setup();
        let out = TempDir::new().unwrap();
        let dir = out.path().join("students");

        write_all_student_results(&dir, &students).unwrap();

        let mut files: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        files.sort();
        assert_eq!(files, vec!["anna.csv", "bob.csv"]);
        let anna = fs::read_to_string(dir.join("anna.csv")).unwrap();
        assert_eq!(anna, "subject,group\nMath,1\n");
    }

    #[test]
    fn test_write_report_json_to_file() {
        let (schedule, students, report) = setup();
        let out = TempDir::new().unwrap();
        let path = out.path().join("report.json");

        write_report_json(&path, &report, &students).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["report"]["moves"], 0);
        assert_eq!(value["students"][1]["name"], "bob");

        let rosters = out.path().join("groups.csv");
        write_group_rosters_file(&rosters, &schedule, &students).unwrap();
        assert_eq!(fs::read_to_string(&rosters).unwrap().lines().count(), 4);
    }

    #[test]
    fn test_write_to_missing_dir_reports_path() {
        let (_, students, report) = setup();
        let out = TempDir::new().unwrap();
        let path = out.path().join("missing").join("report.json");
        let err = write_report_json(&path, &report, &students).unwrap_err();
        assert!(matches!(err, WriteError::Io { ref path, .. } if path.ends_with("missing/report.json")));
    }
}
