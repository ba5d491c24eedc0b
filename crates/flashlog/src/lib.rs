//! `flashlog` - A persistent record log on raw NOR flash
//!
//! This library stores short text records in a single erasable flash region.
//! Records are appended left to right, each new record tombstones the previous
//! one, and space is reclaimed only by erasing the whole region.
//!
//! ```no_run
//! use flashlog::{FixedRegion, LogHandle, RamMedium};
//!
//! let region = FixedRegion { base: 0x7F000, size: 4096 };
//! let medium = RamMedium::new(region.base, region.size);
//! let mut log = LogHandle::open(medium, &region)?;
//!
//! log.append("21")?;
//! for entry in log.replay()? {
//!     let entry = entry?;
//!     println!("{} {}", entry.state, entry.payload);
//! }
//! # Ok::<(), flashlog::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod log;
pub mod logging;
pub mod medium;
pub mod record;
pub mod region;
pub mod sampler;

pub use config::Config;
pub use error::{Error, Result};
pub use log::{LogHandle, LogStatus, Replay};
pub use logging::init_logging;
pub use medium::{FileMedium, Medium, MediumError, RamMedium};
pub use record::{Entry, RecordState, MAX_PAYLOAD_LEN, RECORD_SIZE};
pub use region::{locate, DeviceGeometry, FixedRegion, Geometry, Location, Region};
pub use sampler::{record_sample, FixedSensor, Reading, TemperatureSensor};
