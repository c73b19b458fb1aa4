// src/core/schedule.rs

//! The shared schedule store.
//!
//! All lectures live in a single map from module name to that module's
//! lectures, guarded by one mutex. Every public operation holds the lock for
//! its whole duration, so the clash check and the insert of an `add` can
//! never interleave with another writer, and readers never see a store in
//! the middle of a mutation.

use crate::core::TimetableError;
use crate::core::lecture::Lecture;
use indexmap::IndexMap;
use parking_lot::Mutex;

/// The line returned in place of an empty schedule dump.
pub const NO_LECTURES_LINE: &str = "No lectures found.";

/// The result of [`Schedule::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Conflict,
}

/// The result of [`Schedule::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// The shared timetable. Cheap to share behind an `Arc`.
#[derive(Debug, Default)]
pub struct Schedule {
    modules: Mutex<IndexMap<String, Vec<Lecture>>>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `lecture` unless it clashes with any stored lecture, in any module.
    pub fn add(&self, lecture: Lecture) -> Result<AddOutcome, TimetableError> {
        lecture.validate()?;
        let mut modules = self.modules.lock();

        let clash = modules
            .values()
            .flatten()
            .any(|existing| existing.clashes_with(&lecture));
        if clash {
            return Ok(AddOutcome::Conflict);
        }

        modules
            .entry(lecture.module.clone())
            .or_default()
            .push(lecture);
        Ok(AddOutcome::Added)
    }

    /// Removes the first lecture in the module's bucket equal to `lecture`.
    pub fn remove(&self, lecture: &Lecture) -> Result<RemoveOutcome, TimetableError> {
        lecture.validate()?;
        let mut modules = self.modules.lock();

        let Some(bucket) = modules.get_mut(&lecture.module) else {
            return Ok(RemoveOutcome::NotFound);
        };
        let Some(pos) = bucket.iter().position(|l| l == lecture) else {
            return Ok(RemoveOutcome::NotFound);
        };
        bucket.remove(pos);

        if bucket.is_empty() {
            modules.shift_remove(&lecture.module);
        }
        Ok(RemoveOutcome::Removed)
    }

    /// Takes a consistent copy of every stored lecture, in module insertion
    /// order and then per-module insertion order.
    pub fn snapshot(&self) -> Snapshot {
        let modules = self.modules.lock();
        Snapshot {
            lectures: modules.values().flatten().cloned().collect(),
        }
    }

    /// Returns the lectures that start before noon, in snapshot order.
    ///
    /// Fails if any stored start label is not a valid `HH:MM` time.
    pub fn early_lectures(&self) -> Result<Vec<Lecture>, TimetableError> {
        let modules = self.modules.lock();
        let mut early = Vec::new();
        for lecture in modules.values().flatten() {
            if lecture.start_hour()? < 12 {
                early.push(lecture.clone());
            }
        }
        Ok(early)
    }

    /// The number of stored lectures across all modules.
    pub fn len(&self) -> usize {
        self.modules.lock().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A point-in-time copy of the schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    lectures: Vec<Lecture>,
}

impl Snapshot {
    pub fn lectures(&self) -> &[Lecture] {
        &self.lectures
    }

    /// The human-readable dump, one line per lecture. An empty schedule
    /// yields the single [`NO_LECTURES_LINE`].
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        let placeholder = self
            .lectures
            .is_empty()
            .then(|| NO_LECTURES_LINE.to_string());
        self.lectures
            .iter()
            .map(ToString::to_string)
            .chain(placeholder)
    }
}
