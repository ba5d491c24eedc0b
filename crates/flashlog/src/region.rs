//! Storage region bounds and the startup scan that finds the write cursor.

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::logging::Hex;
use crate::medium::{Medium, QUANTUM};
use crate::record::{self, RecordState, RECORD_SIZE};

/// Source of the storage region's placement on the device.
pub trait Geometry {
    /// Base address and size in bytes of the region.
    fn region_base_and_size(&self) -> (u32, u32);
}

/// Program flash geometry as reported by the device.
///
/// The region is the last page of the program area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceGeometry {
    page_size: u32,
    page_count: u32,
}

impl DeviceGeometry {
    /// Describe a program area of `page_count` pages of `page_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the geometry has no pages, the pages are not word
    /// aligned, or the program area does not fit in the 32-bit address space.
    pub fn new(page_size: u32, page_count: u32) -> Result<Self> {
        if page_count == 0 {
            return Err(Error::invalid_geometry("page count must be greater than 0"));
        }
        if page_size == 0 || page_size % QUANTUM != 0 {
            return Err(Error::invalid_geometry(format!(
                "page size {page_size} must be a non-zero multiple of {QUANTUM}"
            )));
        }
        if u64::from(page_size) * u64::from(page_count) > u64::from(u32::MAX) + 1 {
            return Err(Error::invalid_geometry(format!(
                "{page_count} pages of {page_size} bytes exceed the address space"
            )));
        }
        Ok(Self {
            page_size,
            page_count,
        })
    }

    /// Size of one erasable page.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of pages in the program area.
    #[must_use]
    pub fn page_count(&self) -> u32 {
        self.page_count
    }
}

impl Geometry for DeviceGeometry {
    fn region_base_and_size(&self) -> (u32, u32) {
        ((self.page_count - 1) * self.page_size, self.page_size)
    }
}

/// A region at an explicit address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRegion {
    /// Base address.
    pub base: u32,
    /// Size in bytes.
    pub size: u32,
}

impl Geometry for FixedRegion {
    fn region_base_and_size(&self) -> (u32, u32) {
        (self.base, self.size)
    }
}

/// Validated bounds of the storage region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    base: u32,
    size: u32,
}

impl Region {
    /// Create a region of `size` bytes at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the region is not word aligned, cannot hold a
    /// single record, or runs past the end of the address space.
    pub fn new(base: u32, size: u32) -> Result<Self> {
        if base % QUANTUM != 0 || size % QUANTUM != 0 {
            return Err(Error::invalid_geometry(format!(
                "region {base:#010x}+{size} is not aligned to {QUANTUM} bytes"
            )));
        }
        if size < RECORD_SIZE {
            return Err(Error::invalid_geometry(format!(
                "region of {size} bytes cannot hold a {RECORD_SIZE}-byte record"
            )));
        }
        if u64::from(base) + u64::from(size) > u64::from(u32::MAX) + 1 {
            return Err(Error::invalid_geometry(format!(
                "region {base:#010x}+{size} exceeds the address space"
            )));
        }
        Ok(Self { base, size })
    }

    /// Query `geometry` for the region bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if the reported bounds are unusable.
    pub fn from_geometry(geometry: &impl Geometry) -> Result<Self> {
        let (base, size) = geometry.region_base_and_size();
        Self::new(base, size)
    }

    /// First address of the region.
    #[must_use]
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Size of the region in bytes.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of whole records the region holds.
    #[must_use]
    pub fn capacity(&self) -> usize {
        (self.size / RECORD_SIZE) as usize
    }

    /// Physical address of record slot `slot`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn slot_address(&self, slot: usize) -> u32 {
        debug_assert!(slot < self.capacity());
        self.base + slot as u32 * RECORD_SIZE
    }

    pub(crate) fn state_address(&self, slot: usize) -> u32 {
        self.slot_address(slot) + record::state_offset()
    }

    pub(crate) fn payload_address(&self, slot: usize, index: usize) -> u32 {
        self.slot_address(slot) + record::payload_offset(index)
    }
}

/// Result of scanning the region at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// The scanned region.
    pub region: Region,
    /// Slot index of the cursor.
    pub cursor: usize,
    /// Whether the region had no valid head and was erased.
    pub erased: bool,
}

impl Location {
    /// Physical address of the cursor slot.
    #[must_use]
    pub fn cursor_address(&self) -> u32 {
        self.region.slot_address(self.cursor)
    }
}

/// Scan `region` for the current record.
///
/// Tombstoned slots are skipped. The first `Valid` slot becomes the cursor and
/// the region is left untouched. Anything else, including a scan that runs
/// past the last slot, means the region has no usable head: it is erased and
/// the cursor is placed at the region base.
///
/// # Errors
///
/// Returns an error if the medium fails to read or erase.
pub fn locate<M: Medium>(region: &Region, medium: &mut M) -> Result<Location> {
    for slot in 0..region.capacity() {
        let word = medium.read_quantum(region.state_address(slot))?;
        match RecordState::from_word(word) {
            Some(RecordState::Valid) => {
                debug!(
                    slot,
                    address = %Hex(region.slot_address(slot)),
                    "Found current record"
                );
                return Ok(Location {
                    region: *region,
                    cursor: slot,
                    erased: false,
                });
            }
            Some(RecordState::Invalid) => {}
            Some(RecordState::Uninitialized) if slot == 0 => {
                debug!(address = %Hex(region.base()), "Region holds no records");
                break;
            }
            _ => {
                warn!(slot, state = %Hex(word), "No valid head record");
                break;
            }
        }
    }

    medium.erase(region.base())?;
    medium.wait_ready();
    info!(
        address = %Hex(region.base()),
        size = region.size(),
        "Erased region"
    );

    Ok(Location {
        region: *region,
        cursor: 0,
        erased: true,
    })
}
