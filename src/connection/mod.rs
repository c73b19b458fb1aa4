// src/connection/mod.rs

//! Manages the lifecycle of a single client connection: reading request
//! lines, dispatching them to the schedule and writing the responses.

mod guard;
mod handler;

pub use guard::ConnectionGuard;
pub use handler::ConnectionHandler;
