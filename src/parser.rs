use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LoadError;
use crate::schedule::{Schedule, Student};

/// Number of columns in a group record
pub const GROUP_COLUMNS: usize = 11;
/// Number of columns in a preference record
pub const PREFERENCE_COLUMNS: usize = 3;

/// One row of the groups sheet, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub subject: String,
    /// C - class, W - lecture, L - laboratory
    pub class_type: String,
    pub teacher: String,
    /// Monday to Friday
    pub weekday: String,
    /// HH:MM
    pub start_time: String,
    /// HH:MM
    pub end_time: String,
    pub room: String,
    /// MM-DD-YY
    pub start_date: String,
    pub frequency: String,
    pub group: String,
    /// Number of seats, -1 for a continuation slot
    pub capacity: String,
}

impl GroupRecord {
    fn from_csv(record: &StringRecord) -> Self {
        let field = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
        Self {
            subject: field(0),
            class_type: field(1),
            teacher: field(2),
            weekday: field(3),
            start_time: field(4),
            end_time: field(5),
            room: field(6),
            start_date: field(7),
            frequency: field(8),
            group: field(9),
            capacity: field(10),
        }
    }
}

/// One row of a student's preference sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub subject: String,
    pub group: String,
    pub rank: String,
}

fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    // First line is always a heading
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input)
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|f| f.trim().is_empty())
}

/// Reads every non-empty row with at least `columns` fields
fn read_rows<R: Read>(input: R, columns: usize) -> Result<Vec<StringRecord>, LoadError> {
    let mut reader = csv_reader(input);
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        if record.len() < columns {
            return Err(LoadError::ShortRecord {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                found: record.len(),
                expected: columns,
            });
        }
        rows.push(record);
    }
    Ok(rows)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_group_records<R: Read>(input: R) -> Result<Vec<GroupRecord>, LoadError> {
    Ok(read_rows(input, GROUP_COLUMNS)?
        .iter()
        .map(GroupRecord::from_csv)
        .collect())
}

pub fn read_preference_records<R: Read>(input: R) -> Result<Vec<PreferenceRecord>, LoadError> {
    Ok(read_rows(input, PREFERENCE_COLUMNS)?
        .iter()
        .map(|r| PreferenceRecord {
            subject: r.get(0).unwrap_or("").to_string(),
            group: r.get(1).unwrap_or("").to_string(),
            rank: r.get(2).unwrap_or("").to_string(),
        })
        .collect())
}

/// Reads student names from the first column
pub fn read_priority_names<R: Read>(input: R) -> Result<Vec<String>, LoadError> {
    Ok(read_rows(input, 1)?
        .iter()
        .filter_map(|r| r.get(0))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect())
}

/// Loads the schedule from a groups CSV file
pub fn load_schedule<P: AsRef<Path>>(path: P) -> Result<Schedule, LoadError> {
    let path = path.as_ref();
    let build = || -> Result<Schedule, LoadError> {
        let records = read_group_records(open(path)?)?;
        Ok(Schedule::from_records(&records)?)
    };
    let schedule = build().map_err(|e| LoadError::in_file(path, e))?;
    info!(
        path = %path.display(),
        subjects = schedule.subjects.len(),
        "loaded schedule"
    );
    Ok(schedule)
}

/// Student name is the file name without its extension
pub fn student_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Loads one student from their preference CSV file
pub fn load_student<P: AsRef<Path>>(path: P) -> Result<Student, LoadError> {
    let path = path.as_ref();
    let build = || -> Result<Student, LoadError> {
        let records = read_preference_records(open(path)?)?;
        Ok(Student::new(student_name(path), &records)?)
    };
    build().map_err(|e| LoadError::in_file(path, e))
}

/// Loads every `*.csv` file in `dir` as a student, in file name order
pub fn load_students<P: AsRef<Path>>(dir: P) -> Result<Vec<Student>, LoadError> {
    let dir = dir.as_ref();
    let io_err = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort();

    let students = files
        .iter()
        .map(load_student)
        .collect::<Result<Vec<_>, _>>()?;
    ensure_unique_names(&students, &files)?;
    info!(path = %dir.display(), students = students.len(), "loaded students");
    Ok(students)
}

/// Names come from file stems, so `anna.csv` and `anna.CSV` would both load as `anna`
fn ensure_unique_names(students: &[Student], files: &[PathBuf]) -> Result<(), LoadError> {
    let mut seen: HashMap<&str, &Path> = HashMap::new();
    for (student, path) in students.iter().zip(files) {
        if seen.insert(student.name.as_str(), path).is_some() {
            return Err(LoadError::DuplicateStudent {
                name: student.name.clone(),
                path: path.clone(),
            });
        }
    }
    Ok(())
}

/// Flags the named students as priority students.
/// Every name must belong to a loaded student.
pub fn mark_priority(students: &mut [Student], names: &[String]) -> Result<usize, LoadError> {
    for name in names {
        let student = students
            .iter_mut()
            .find(|s| s.name == *name)
            .ok_or_else(|| LoadError::UnknownPriorityStudent(name.clone()))?;
        student.priority = true;
        debug!(student = %name, "priority student");
    }
    Ok(students.iter().filter(|s| s.priority).count())
}

/// Reads the priority list and flags the named students
pub fn load_priority<P: AsRef<Path>>(path: P, students: &mut [Student]) -> Result<usize, LoadError> {
    let path = path.as_ref();
    let names = read_priority_names(open(path)?).map_err(|e| LoadError::in_file(path, e))?;
    let count = mark_priority(students, &names)?;
    info!(path = %path.display(), priority = count, "loaded priority students");
    Ok(count)
}
