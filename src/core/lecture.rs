// src/core/lecture.rs

//! The `Lecture` value type and the clash predicate between two lectures.

use crate::core::TimetableError;
use std::fmt;

/// One scheduled session. Two lectures with identical fields are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lecture {
    pub module: String,
    pub day: String,
    pub start: String,
    pub end: String,
    pub room: String,
}

impl Lecture {
    pub fn new(
        module: impl Into<String>,
        day: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        room: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            day: day.into(),
            start: start.into(),
            end: end.into(),
            room: room.into(),
        }
    }

    /// Two lectures clash when they share a day and a room and agree on
    /// either the start or the end label. Partial overlaps are not detected.
    pub fn clashes_with(&self, other: &Lecture) -> bool {
        self.day == other.day
            && self.room == other.room
            && (self.start == other.start || self.end == other.end)
    }

    /// Rejects lectures with any empty field.
    pub fn validate(&self) -> Result<(), TimetableError> {
        let fields = [
            ("module", &self.module),
            ("day", &self.day),
            ("start", &self.start),
            ("end", &self.end),
            ("room", &self.room),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(TimetableError::EmptyField(name));
            }
        }
        Ok(())
    }

    /// Parses the hour out of the `HH:MM` start label.
    pub fn start_hour(&self) -> Result<u32, TimetableError> {
        parse_hour(&self.start)
    }
}

fn parse_hour(label: &str) -> Result<u32, TimetableError> {
    let invalid = || TimetableError::InvalidTime(label.to_string());
    let (hours, minutes) = label.split_once(':').ok_or_else(invalid)?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hours) || !all_digits(minutes) {
        return Err(invalid());
    }
    hours.parse::<u32>().map_err(|_| invalid())
}

impl fmt::Display for Lecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} from {} to {} in {}",
            self.module, self.day, self.start, self.end, self.room
        )
    }
}
