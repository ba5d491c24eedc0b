//! Flash image persisted to a file.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{Medium, MediumError, RamMedium, Result};
use crate::error::Error;

/// A flash block backed by an image file on disk.
///
/// Behaves exactly like [`RamMedium`]; every accepted write and erase is also
/// written through to the image and synced, so reopening the image after the
/// process exits behaves like a device power cycle.
#[derive(Debug)]
pub struct FileMedium {
    path: PathBuf,
    file: File,
    block: RamMedium,
}

impl FileMedium {
    /// Open the image at `path`, creating an erased one if it does not exist.
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be created or read, or if an
    /// existing image is not exactly `size` bytes long.
    pub fn open(path: impl AsRef<Path>, base: u32, size: u32) -> crate::Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(MediumError::from)?;

        let expected = u64::from(size);
        let actual = file.metadata().map_err(MediumError::from)?.len();

        let block = if actual == 0 {
            info!("Creating erased flash image at {}", path.display());
            let block = RamMedium::new(base, size);
            file.write_all(block.as_bytes()).map_err(MediumError::from)?;
            file.sync_all().map_err(MediumError::from)?;
            block
        } else if actual == expected {
            debug!("Loading flash image from {}", path.display());
            let mut cells = Vec::with_capacity(size as usize);
            file.read_to_end(&mut cells).map_err(MediumError::from)?;
            RamMedium::from_bytes(base, cells)
        } else {
            return Err(MediumError::ImageSize {
                path,
                expected,
                actual,
            }
            .into());
        };

        Ok(Self { path, file, block })
    }

    /// Keep the medium busy for `polls` readiness checks after every operation.
    #[must_use]
    pub fn with_write_latency(mut self, polls: u32) -> Self {
        self.block = self.block.with_write_latency(polls);
        self
    }

    /// Path of the backing image.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `operation` to a copy of the block and write the changed bytes
    /// through before committing the copy, so a failed write leaves the
    /// cached block matching the image on disk.
    fn write_through(
        &mut self,
        offset: usize,
        len: usize,
        operation: impl FnOnce(&mut RamMedium) -> Result<()>,
    ) -> Result<()> {
        let mut next = self.block.clone();
        operation(&mut next)?;
        self.file.seek(SeekFrom::Start(offset as u64))?;
        self.file.write_all(&next.as_bytes()[offset..offset + len])?;
        self.file.sync_data()?;
        self.block = next;
        Ok(())
    }
}

impl Medium for FileMedium {
    fn read_quantum(&self, address: u32) -> Result<u32> {
        self.block.read_quantum(address)
    }

    fn write_quantum(&mut self, address: u32, value: u32) -> Result<()> {
        let offset = self.block.offset(address)?;
        self.write_through(offset, super::QUANTUM as usize, |block| {
            block.write_quantum(address, value)
        })
    }

    fn erase(&mut self, address: u32) -> Result<()> {
        let len = self.block.as_bytes().len();
        self.write_through(0, len, |block| block.erase(address))
    }

    fn is_busy(&self) -> bool {
        self.block.is_busy()
    }
}
