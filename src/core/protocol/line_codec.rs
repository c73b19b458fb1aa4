// src/core/protocol/line_codec.rs

//! Implements the newline-delimited framing used on the wire, with a
//! `Decoder` yielding request lines and an `Encoder` for server responses.

use crate::core::TimetableError;
use crate::core::schedule::{AddOutcome, RemoveOutcome};
use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// The line terminating a multi-line schedule dump.
pub const END_SENTINEL: &str = "END";

pub const LECTURE_ADDED: &str = "Lecture added successfully.";
pub const SCHEDULING_CLASH: &str = "Scheduling clash detected.";
pub const LECTURE_REMOVED: &str = "Lecture removed.";
pub const LECTURE_NOT_FOUND: &str = "Lecture not found.";
pub const NO_EARLY_LECTURES: &str = "No early lectures found.";
pub const STOP_ACK: &str = "TERMINATE";

/// Prefix of every client-facing error line.
const ERROR_PREFIX: &str = "Error: ";

/// Default upper bound on the length of a single request line.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 8 * 1024;

/// A response written back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// A single status line.
    Line(String),
    /// Several lines followed by the `END` sentinel.
    Block(Vec<String>),
    /// A single `Error: <reason>` line.
    Error(String),
}

impl Response {
    pub fn line(text: impl Into<String>) -> Self {
        Response::Line(text.into())
    }

    /// The lines this response puts on the wire, in order, without line endings.
    pub fn wire_lines(&self) -> Vec<String> {
        match self {
            Response::Line(line) => vec![line.clone()],
            Response::Block(lines) => lines
                .iter()
                .cloned()
                .chain(std::iter::once(END_SENTINEL.to_string()))
                .collect(),
            Response::Error(reason) => vec![format!("{ERROR_PREFIX}{reason}")],
        }
    }
}

impl From<AddOutcome> for Response {
    fn from(outcome: AddOutcome) -> Self {
        match outcome {
            AddOutcome::Added => Response::line(LECTURE_ADDED),
            AddOutcome::Conflict => Response::line(SCHEDULING_CLASH),
        }
    }
}

impl From<RemoveOutcome> for Response {
    fn from(outcome: RemoveOutcome) -> Self {
        match outcome {
            RemoveOutcome::Removed => Response::line(LECTURE_REMOVED),
            RemoveOutcome::NotFound => Response::line(LECTURE_NOT_FOUND),
        }
    }
}

impl From<TimetableError> for Response {
    fn from(e: TimetableError) -> Self {
        Response::Error(e.to_string())
    }
}

/// A `tokio_util::codec` implementation for the line protocol.
#[derive(Debug)]
pub struct LineCodec {
    max_length: usize,
    /// Where to resume scanning for `\n` in a partially received line.
    next_index: usize,
}

impl LineCodec {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            next_index: 0,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LENGTH)
    }
}

/// Strips a trailing `\r` and decodes the line, replacing invalid UTF-8.
fn line_from_bytes(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = TimetableError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let newline = src[self.next_index..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|offset| self.next_index + offset);

        match newline {
            Some(pos) => {
                self.next_index = 0;
                if pos > self.max_length {
                    return Err(TimetableError::LineTooLong(self.max_length));
                }
                let frame = src.split_to(pos + 1);
                Ok(Some(line_from_bytes(&frame[..pos])))
            }
            None => {
                if src.len() > self.max_length {
                    return Err(TimetableError::LineTooLong(self.max_length));
                }
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    /// A final line without a trailing newline is still delivered.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if src.is_empty() {
            return Ok(None);
        }
        self.next_index = 0;
        let frame = src.split_to(src.len());
        Ok(Some(line_from_bytes(&frame)))
    }
}

impl Encoder<Response> for LineCodec {
    type Error = TimetableError;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        for line in item.wire_lines() {
            dst.reserve(line.len() + 1);
            dst.put_slice(line.as_bytes());
            dst.put_u8(b'\n');
        }
        Ok(())
    }
}
