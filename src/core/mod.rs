// src/core/mod.rs

//! The central module containing the scheduling logic and data structures.

pub mod errors;
pub mod events;
pub mod lecture;
pub mod metrics;
pub mod protocol;
pub mod schedule;
pub mod state;

pub use errors::TimetableError;
pub use lecture::Lecture;
pub use protocol::{Request, Response};
pub use schedule::Schedule;
