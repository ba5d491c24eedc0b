//! On-flash record layout.
//!
//! A record occupies a fixed 256-byte slot:
//!
//! ```text
//! [state:u32][payload[0]:u32][payload[1]:u32] ... [payload[62]:u32]
//!     4B          4B              4B                   4B
//! ```
//!
//! Each payload byte lives in the low byte of its own quantum because the
//! medium only accepts whole-word writes. The payload is terminated by a
//! quantum holding zero; quanta past the terminator stay erased.
//!
//! The state word moves `Uninitialized -> Valid -> Invalid`. Every step only
//! clears bits, so each transition is a single quantum write.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::medium::QUANTUM;

/// Maximum payload length in bytes.
pub const MAX_PAYLOAD_LEN: usize = 62;

/// Number of payload quanta per record, including the terminator.
pub const PAYLOAD_QUANTA: usize = MAX_PAYLOAD_LEN + 1;

/// Size of one record slot in bytes.
#[allow(clippy::cast_possible_truncation)]
pub const RECORD_SIZE: u32 = QUANTUM * (1 + PAYLOAD_QUANTA as u32);

/// State word of a slot that has never been written since the last erase.
pub const STATE_UNINITIALIZED: u32 = 0xFFFF_FFFF;

/// State word of the current record.
pub const STATE_VALID: u32 = 0xA55A_5AA5;

/// State word of a superseded record.
pub const STATE_INVALID: u32 = 0xA55A_0000;

/// Lifecycle state of a record slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    /// Erased slot, all bits set.
    Uninitialized,
    /// The newest committed record.
    Valid,
    /// A record superseded by a later one.
    Invalid,
}

impl RecordState {
    /// Decode a state word. Returns `None` for any unrecognized bit pattern.
    #[must_use]
    pub fn from_word(word: u32) -> Option<Self> {
        match word {
            STATE_UNINITIALIZED => Some(Self::Uninitialized),
            STATE_VALID => Some(Self::Valid),
            STATE_INVALID => Some(Self::Invalid),
            _ => None,
        }
    }

    /// The state word stored on flash.
    #[must_use]
    pub fn word(self) -> u32 {
        match self {
            Self::Uninitialized => STATE_UNINITIALIZED,
            Self::Valid => STATE_VALID,
            Self::Invalid => STATE_INVALID,
        }
    }

    /// Whether a record in this state carries a committed payload.
    #[must_use]
    pub fn is_committed(self) -> bool {
        matches!(self, Self::Valid | Self::Invalid)
    }
}

impl std::fmt::Display for RecordState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Valid => write!(f, "valid"),
            Self::Invalid => write!(f, "invalid"),
        }
    }
}

/// A committed record read back from flash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Slot index within the region.
    pub slot: usize,
    /// Either [`RecordState::Valid`] or [`RecordState::Invalid`].
    pub state: RecordState,
    /// The decoded payload.
    pub payload: String,
}

/// Encode a payload into the quanta to program, terminator included.
///
/// # Errors
///
/// Returns [`Error::PayloadTooLong`] if the payload exceeds
/// [`MAX_PAYLOAD_LEN`] bytes, or [`Error::PayloadContainsNul`] if it contains
/// the terminator byte.
pub fn encode_payload(payload: &str) -> Result<Vec<u32>> {
    let bytes = payload.as_bytes();
    if bytes.len() > MAX_PAYLOAD_LEN {
        return Err(Error::PayloadTooLong {
            len: bytes.len(),
            max: MAX_PAYLOAD_LEN,
        });
    }
    if let Some(position) = bytes.iter().position(|&b| b == 0) {
        return Err(Error::PayloadContainsNul { position });
    }

    let mut quanta: Vec<u32> = bytes.iter().map(|&b| u32::from(b)).collect();
    quanta.push(0);
    Ok(quanta)
}

/// Decode payload quanta back into a string.
///
/// Only the low byte of each quantum is significant. Decoding stops at the
/// first zero byte; bytes that are not valid UTF-8 are replaced.
#[must_use]
pub fn decode_payload(quanta: &[u32]) -> String {
    let bytes: Vec<u8> = quanta
        .iter()
        .map(|q| q.to_le_bytes()[0])
        .take_while(|&b| b != 0)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Byte offset of the state word within a record.
pub(crate) const fn state_offset() -> u32 {
    0
}

/// Byte offset of payload quantum `index` within a record.
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn payload_offset(index: usize) -> u32 {
    QUANTUM * (1 + index as u32)
}
