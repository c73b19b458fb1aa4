// src/core/protocol/mod.rs

//! The line-oriented wire protocol: request parsing and the framing codec.

pub mod line_codec;
pub mod request;

pub use line_codec::{END_SENTINEL, LineCodec, Response};
pub use request::{FIELD_DELIMITER, Request};
