pub mod types;
pub mod slot_utils;
pub mod preference;
pub mod group;
pub mod subject;
pub mod student;
pub mod timetable;
pub mod move_chain;
pub mod enroll;

pub use types::{
    Capacity, Clash, ClassType, EnrollmentReport, Placement, Shortfall, StudentId,
    SubjectConflicts, TimeSlot,
};
pub use preference::PreferenceTable;
pub use group::Group;
pub use subject::Subject;
pub use student::Student;
pub use timetable::Schedule;
pub use enroll::{assign, audit_clashes, enroll, mean_happiness, resolve};
