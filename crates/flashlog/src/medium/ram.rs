//! In-memory NOR flash simulation.

use std::cell::Cell;

use tracing::trace;

use super::{Medium, MediumError, Result, Window, QUANTUM};
use crate::logging::Hex;

/// A single erasable flash block held in memory.
///
/// Writes AND the new value into the stored word, so bits can only be cleared
/// until the next erase. An optional write latency keeps the medium busy for a
/// number of [`Medium::is_busy`] polls after each write or erase, and writes
/// issued while busy are rejected with [`MediumError::Busy`].
#[derive(Debug, Clone)]
pub struct RamMedium {
    window: Window,
    cells: Vec<u8>,
    latency_polls: u32,
    busy_polls: Cell<u32>,
    writes: usize,
    erases: usize,
}

impl RamMedium {
    /// Create an erased block of `size` bytes starting at `base`.
    #[must_use]
    pub fn new(base: u32, size: u32) -> Self {
        Self::from_bytes(base, vec![0xFF; size as usize])
    }

    /// Create a block from a raw image, e.g. one loaded from disk.
    #[must_use]
    pub fn from_bytes(base: u32, cells: Vec<u8>) -> Self {
        Self {
            window: Window {
                base,
                len: cells.len(),
            },
            cells,
            latency_polls: 0,
            busy_polls: Cell::new(0),
            writes: 0,
            erases: 0,
        }
    }

    /// Keep the medium busy for `polls` readiness checks after every operation.
    #[must_use]
    pub fn with_write_latency(mut self, polls: u32) -> Self {
        self.latency_polls = polls;
        self
    }

    /// First address of the block.
    #[must_use]
    pub fn base(&self) -> u32 {
        self.window.base
    }

    /// Raw contents of the block.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    /// Number of quantum writes accepted since creation.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Number of erases performed since creation.
    #[must_use]
    pub fn erase_count(&self) -> usize {
        self.erases
    }

    pub(crate) fn offset(&self, address: u32) -> Result<usize> {
        self.window.offset(address)
    }

    fn start_operation(&self) -> Result<()> {
        if self.busy_polls.get() > 0 {
            return Err(MediumError::Busy);
        }
        self.busy_polls.set(self.latency_polls);
        Ok(())
    }
}

impl Medium for RamMedium {
    fn read_quantum(&self, address: u32) -> Result<u32> {
        let offset = self.window.offset(address)?;
        let mut word = [0u8; QUANTUM as usize];
        word.copy_from_slice(&self.cells[offset..offset + QUANTUM as usize]);
        Ok(u32::from_le_bytes(word))
    }

    fn write_quantum(&mut self, address: u32, value: u32) -> Result<()> {
        let offset = self.window.offset(address)?;
        self.start_operation()?;
        let cell = &mut self.cells[offset..offset + QUANTUM as usize];
        for (stored, new) in cell.iter_mut().zip(value.to_le_bytes()) {
            *stored &= new;
        }
        self.writes += 1;
        trace!(address = %Hex(address), value = %Hex(value), "Programmed quantum");
        Ok(())
    }

    fn erase(&mut self, address: u32) -> Result<()> {
        if address != self.window.base {
            return Err(MediumError::EraseAddress {
                address,
                base: self.window.base,
            });
        }
        self.start_operation()?;
        self.cells.fill(0xFF);
        self.erases += 1;
        Ok(())
    }

    fn is_busy(&self) -> bool {
        let remaining = self.busy_polls.get();
        if remaining == 0 {
            return false;
        }
        self.busy_polls.set(remaining - 1);
        true
    }
}
