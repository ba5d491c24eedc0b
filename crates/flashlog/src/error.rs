//! Error types for flashlog.
//!
//! This module defines the error taxonomy of the record log. Conditions that
//! can only be cleared by erasing the region are reported as-is; the log never
//! erases on its own behalf.

use std::path::PathBuf;
use thiserror::Error;

use crate::medium::MediumError;

/// The main error type for flashlog operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record Log Errors ===
    /// The payload does not fit in a record.
    #[error("payload is {len} bytes long; a record holds at most {max}")]
    PayloadTooLong {
        /// Encoded length of the rejected payload.
        len: usize,
        /// Maximum payload length.
        max: usize,
    },

    /// The payload contains a NUL byte, which is the on-flash terminator.
    #[error("payload contains a NUL byte at position {position}")]
    PayloadContainsNul {
        /// Byte offset of the NUL.
        position: usize,
    },

    /// No slot remains before the end of the region.
    #[error("region is full ({capacity} records); erase it first")]
    RegionFull {
        /// Number of record slots in the region.
        capacity: usize,
    },

    /// A slot holds a state word that is none of the known values.
    #[error("corrupted record at slot {slot} ({address:#010x}): state word {state:#010x}; erase the region first")]
    RegionCorrupted {
        /// Index of the offending slot.
        slot: usize,
        /// Physical address of the slot.
        address: u32,
        /// The state word found there.
        state: u32,
    },

    /// Replay was requested but nothing has been committed since the last erase.
    #[error("log is empty; write something first")]
    LogEmpty,

    // === Region Errors ===
    /// The device geometry or region bounds are unusable.
    #[error("invalid region geometry: {message}")]
    InvalidGeometry {
        /// Description of the problem.
        message: String,
    },

    // === Medium Errors ===
    /// The flash medium rejected an operation.
    #[error("flash medium error: {0}")]
    Medium(#[from] MediumError),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for flashlog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new invalid geometry error.
    #[must_use]
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }

    /// Check if recovering from this error requires erasing the region.
    #[must_use]
    pub fn requires_erase(&self) -> bool {
        matches!(self, Self::RegionFull { .. } | Self::RegionCorrupted { .. })
    }

    /// Check if this error only reports that the log holds no records.
    #[must_use]
    pub fn is_empty_log(&self) -> bool {
        matches!(self, Self::LogEmpty)
    }
}
