// tests/property/clash_test.rs

//! Property-based tests for the clash predicate as enforced by `Schedule::add`.

use proptest::prelude::*;
use timetabled::core::Lecture;
use timetabled::core::schedule::{AddOutcome, Schedule};

fn label() -> impl Strategy<Value = String> {
    (0u32..24, prop::sample::select(vec![0u32, 15, 30, 45]))
        .prop_map(|(h, m)| format!("{h:02}:{m:02}"))
}

fn day() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"])
        .prop_map(String::from)
}

fn room() -> impl Strategy<Value = String> {
    "Room [A-E]"
}

fn module() -> impl Strategy<Value = String> {
    "[A-Z]{2}[0-9]{3}"
}

fn outcomes(first: &Lecture, second: &Lecture) -> (AddOutcome, AddOutcome) {
    let schedule = Schedule::new();
    let a = schedule.add(first.clone()).unwrap();
    let b = schedule.add(second.clone()).unwrap();
    (a, b)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn shared_endpoint_admits_exactly_one(
        m1 in module(), m2 in module(),
        d in day(), r in room(),
        shared in label(), other1 in label(), other2 in label(),
        share_start in any::<bool>(),
        swap in any::<bool>(),
    ) {
        let (a, b) = if share_start {
            (
                Lecture::new(m1, d.clone(), shared.clone(), other1, r.clone()),
                Lecture::new(m2, d, shared, other2, r),
            )
        } else {
            (
                Lecture::new(m1, d.clone(), other1, shared.clone(), r.clone()),
                Lecture::new(m2, d, other2, shared, r),
            )
        };
        let (first, second) = if swap { (&b, &a) } else { (&a, &b) };
        prop_assert_eq!(outcomes(first, second), (AddOutcome::Added, AddOutcome::Conflict));
    }

    #[test]
    fn different_day_or_room_never_clashes(
        m1 in module(), m2 in module(),
        d1 in day(), d2 in day(),
        r1 in room(), r2 in room(),
        start in label(), end in label(),
    ) {
        prop_assume!(d1 != d2 || r1 != r2);
        let a = Lecture::new(m1, d1, start.clone(), end.clone(), r1);
        let b = Lecture::new(m2, d2, start, end, r2);
        prop_assert_eq!(outcomes(&a, &b), (AddOutcome::Added, AddOutcome::Added));
    }

    #[test]
    fn distinct_endpoints_never_clash(
        m1 in module(), m2 in module(),
        d in day(), r in room(),
        s1 in label(), s2 in label(), e1 in label(), e2 in label(),
    ) {
        prop_assume!(s1 != s2 && e1 != e2);
        let a = Lecture::new(m1, d.clone(), s1, e1, r.clone());
        let b = Lecture::new(m2, d, s2, e2, r);
        prop_assert_eq!(outcomes(&a, &b), (AddOutcome::Added, AddOutcome::Added));
    }
}
