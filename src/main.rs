use clap::Parser;
use tracing::info;

use class_enrollment::config::Config;
use class_enrollment::display::{
    print_summary, write_all_student_results, write_group_rosters_file, write_report_json,
};
use class_enrollment::enroll;
use class_enrollment::parser::{load_priority, load_schedule, load_students};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter())
        .with_target(false)
        .init();

    info!("Loading groups from {}", config.groups.display());
    let mut schedule = load_schedule(&config.groups)?;

    info!("Loading students from {}", config.students.display());
    let mut students = load_students(&config.students)?;

    if let Some(priority) = &config.priority {
        load_priority(priority, &mut students)?;
    }

    let report = enroll(&mut schedule, &mut students);

    write_all_student_results(&config.students_output(), &students)?;
    write_group_rosters_file(&config.groups_output(), &schedule, &students)?;
    if let Some(path) = &config.report {
        write_report_json(path, &report, &students)?;
    }

    print_summary(&report);
    println!("\nResults saved to {}", config.output.display());

    Ok(())
}
