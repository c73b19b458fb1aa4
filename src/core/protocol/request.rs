// src/core/protocol/request.rs

//! Parses a single protocol line into a typed `Request`.

use crate::core::TimetableError;
use crate::core::lecture::Lecture;

/// The literal separator between fields of a request line.
pub const FIELD_DELIMITER: &str = "; ";

const ADD_LECTURE: &str = "Add Lecture";
const REMOVE_LECTURE: &str = "Remove Lecture";
const DISPLAY_SCHEDULE: &str = "Display Schedule";
const EARLY_LECTURES: &str = "Early Lectures";
const STOP: &str = "STOP";

/// A parsed client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    AddLecture(Lecture),
    RemoveLecture(Lecture),
    DisplaySchedule,
    EarlyLectures,
    Stop,
}

impl Request {
    /// The protocol keyword for this request.
    pub fn name(&self) -> &'static str {
        match self {
            Request::AddLecture(_) => ADD_LECTURE,
            Request::RemoveLecture(_) => REMOVE_LECTURE,
            Request::DisplaySchedule => DISPLAY_SCHEDULE,
            Request::EarlyLectures => EARLY_LECTURES,
            Request::Stop => STOP,
        }
    }

    /// Renders the request back into a protocol line, without the line ending.
    pub fn to_line(&self) -> String {
        match self {
            Request::AddLecture(l) | Request::RemoveLecture(l) => [
                self.name(),
                l.module.as_str(),
                l.day.as_str(),
                l.start.as_str(),
                l.end.as_str(),
                l.room.as_str(),
            ]
            .join(FIELD_DELIMITER),
            _ => self.name().to_string(),
        }
    }
}

impl TryFrom<&str> for Request {
    type Error = TimetableError;

    /// Splits on `"; "` and dispatches on the first field. Fields are not
    /// trimmed, and empty fields are left for the store to reject. Commands
    /// without arguments ignore any trailing fields.
    fn try_from(line: &str) -> Result<Self, Self::Error> {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        let keyword = fields[0];

        match keyword {
            ADD_LECTURE => parse_lecture(keyword, &fields).map(Request::AddLecture),
            REMOVE_LECTURE => parse_lecture(keyword, &fields).map(Request::RemoveLecture),
            DISPLAY_SCHEDULE => Ok(Request::DisplaySchedule),
            EARLY_LECTURES => Ok(Request::EarlyLectures),
            STOP => Ok(Request::Stop),
            other => Err(TimetableError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse_lecture(keyword: &str, fields: &[&str]) -> Result<Lecture, TimetableError> {
    match fields {
        [_, module, day, start, end, room] => Ok(Lecture::new(*module, *day, *start, *end, *room)),
        _ => Err(TimetableError::WrongArgumentCount(keyword.to_string())),
    }
}
