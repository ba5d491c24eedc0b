//! Flash medium driver abstraction.
//!
//! The record log talks to non-volatile memory only through the [`Medium`]
//! trait. A medium addresses memory in 4-byte quanta, can only clear bits when
//! writing, and needs a block erase to set them again. Each write or erase
//! leaves the medium busy for a while; callers must wait until it is ready
//! before issuing the next operation.

mod file;
mod ram;

use std::path::PathBuf;

use thiserror::Error;

pub use file::FileMedium;
pub use ram::RamMedium;

/// Size in bytes of the smallest writable unit.
pub const QUANTUM: u32 = 4;

/// Value of a quantum after erase.
pub const ERASED_WORD: u32 = 0xFFFF_FFFF;

/// Errors raised by a flash medium.
#[derive(Debug, Error)]
pub enum MediumError {
    /// The address lies outside the memory the medium exposes.
    #[error("address {address:#010x} is outside {base:#010x}..{end:#010x}")]
    OutOfBounds {
        /// Requested address.
        address: u32,
        /// First address of the medium window.
        base: u32,
        /// One past the last address of the medium window.
        end: u64,
    },

    /// The address is not aligned to a quantum boundary.
    #[error("address {address:#010x} is not aligned to a 4-byte quantum")]
    Misaligned {
        /// Requested address.
        address: u32,
    },

    /// Erase must be addressed at the start of the erasable block.
    #[error("erase address {address:#010x} is not the block start {base:#010x}")]
    EraseAddress {
        /// Requested address.
        address: u32,
        /// Start of the erasable block.
        base: u32,
    },

    /// An operation was issued while the previous one was still in progress.
    #[error("medium is busy")]
    Busy,

    /// The value read back after a write differs from the value written.
    #[error("write verify failed at {address:#010x}: wrote {expected:#010x}, read back {actual:#010x}")]
    WriteVerify {
        /// Address written.
        address: u32,
        /// Value written.
        expected: u32,
        /// Value found after the write completed.
        actual: u32,
    },

    /// An existing flash image has the wrong size for the region.
    #[error("flash image {path} is {actual} bytes, expected {expected}")]
    ImageSize {
        /// Path of the image file.
        path: PathBuf,
        /// Size the region requires.
        expected: u64,
        /// Size found on disk.
        actual: u64,
    },

    /// The backing file could not be read or written.
    #[error("flash image I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for medium operations.
pub type Result<T> = std::result::Result<T, MediumError>;

/// A word-addressed, erase-before-write non-volatile memory.
///
/// Implementations must honour the programming rules of NOR flash: a write
/// can only clear bits (the stored value becomes `old & value`), and only
/// [`Medium::erase`] sets them back to one.
pub trait Medium {
    /// Read the quantum at `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is misaligned or outside the medium.
    fn read_quantum(&self, address: u32) -> Result<u32>;

    /// Program the quantum at `address` with `value`.
    ///
    /// Must not be called while [`Medium::is_busy`] reports `true`.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium is busy, or `address` is misaligned or
    /// outside the medium.
    fn write_quantum(&mut self, address: u32, value: u32) -> Result<()>;

    /// Erase the block starting at `address`, setting every bit to one.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium is busy or `address` is not a block start.
    fn erase(&mut self, address: u32) -> Result<()>;

    /// Whether the last write or erase is still in progress.
    fn is_busy(&self) -> bool;

    /// Block until the medium is ready for the next operation.
    fn wait_ready(&self) {
        while self.is_busy() {
            std::hint::spin_loop();
        }
    }
}

/// Bounds of the memory a simulated medium exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    pub(crate) base: u32,
    pub(crate) len: usize,
}

impl Window {
    /// Translate a physical address into a byte offset inside the window.
    pub(crate) fn offset(self, address: u32) -> Result<usize> {
        if address % QUANTUM != 0 {
            return Err(MediumError::Misaligned { address });
        }
        let end = u64::from(self.base) + self.len as u64;
        if address < self.base || u64::from(address) + u64::from(QUANTUM) > end {
            return Err(MediumError::OutOfBounds {
                address,
                base: self.base,
                end,
            });
        }
        Ok((address - self.base) as usize)
    }
}
