// tests/property/query_test.rs

//! Property-based tests for the read-only queries.

use proptest::prelude::*;
use timetabled::core::Lecture;
use timetabled::core::schedule::Schedule;

fn lecture() -> impl Strategy<Value = Lecture> {
    ("[A-Z]{2}[0-9]{3}", 0u32..24, 0u32..60, "Room [A-Z][0-9]")
        .prop_map(|(module, hour, minute, room)| {
            Lecture::new(module, "Thursday", format!("{hour:02}:{minute:02}"), "23:59", room)
        })
}

fn populated(lectures: Vec<Lecture>) -> Schedule {
    let schedule = Schedule::new();
    for l in lectures {
        schedule.add(l).unwrap();
    }
    schedule
}

proptest! {
    #[test]
    fn queries_are_idempotent(lectures in prop::collection::vec(lecture(), 0..30)) {
        let schedule = populated(lectures);
        prop_assert_eq!(schedule.snapshot(), schedule.snapshot());
        prop_assert_eq!(schedule.early_lectures().unwrap(), schedule.early_lectures().unwrap());
    }

    #[test]
    fn early_lectures_is_the_morning_subsequence(
        lectures in prop::collection::vec(lecture(), 0..30),
    ) {
        let schedule = populated(lectures);
        let expected: Vec<Lecture> = schedule
            .snapshot()
            .lectures()
            .iter()
            .filter(|l| l.start[..2].parse::<u32>().unwrap() < 12)
            .cloned()
            .collect();
        prop_assert_eq!(schedule.early_lectures().unwrap(), expected);
    }
}
