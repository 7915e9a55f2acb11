use chrono::{NaiveDate, NaiveTime, Weekday};

/// Format of session start and end times, e.g. `14:00`
pub const TIME_FORMAT: &str = "%H:%M";

/// Format of a group's start date, e.g. `03-05-20` for the 5th of March 2020
pub const DATE_FORMAT: &str = "%m-%d-%y";

/// Parses a time string (HH:MM)
pub fn parse_time(time_str: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(time_str.trim(), TIME_FORMAT)
}

/// Parses a start date (MM-DD-YY)
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT)
}

/// Maps a full English weekday name to a teaching day.
/// Weekends are not part of the timetable.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.trim() {
        "Monday" => Some(Weekday::Mon),
        "Tuesday" => Some(Weekday::Tue),
        "Wednesday" => Some(Weekday::Wed),
        "Thursday" => Some(Weekday::Thu),
        "Friday" => Some(Weekday::Fri),
        _ => None,
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Formats a time back to HH:MM
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}
