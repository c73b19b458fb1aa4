// tests/integration/fixtures.rs

//! Common request lines and generators shared across tests.

pub const ADD_CS101: &str = "Add Lecture; CS101; Monday; 09:00; 10:00; Room A";
pub const CS101_LINE: &str = "CS101: Monday from 09:00 to 10:00 in Room A";

/// Builds an `Add Lecture` request line.
pub fn add_line(module: &str, day: &str, start: &str, end: &str, room: &str) -> String {
    format!("Add Lecture; {module}; {day}; {start}; {end}; {room}")
}

/// Builds a `Remove Lecture` request line.
pub fn remove_line(module: &str, day: &str, start: &str, end: &str, room: &str) -> String {
    format!("Remove Lecture; {module}; {day}; {start}; {end}; {room}")
}

/// The `i`-th lecture of a set that never clash: each one gets its own room.
pub fn distinct_add_line(i: usize) -> String {
    add_line(&format!("MOD{i}"), "Monday", "09:00", "10:00", &format!("Room {i}"))
}
