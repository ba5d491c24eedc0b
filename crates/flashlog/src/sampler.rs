//! Temperature sampling producer.
//!
//! The die temperature sensor reports in quarter-degree units. A sample is
//! converted to whole degrees Celsius and stored as a short decimal string.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::log::LogHandle;
use crate::medium::Medium;

/// A source of raw temperature readings.
pub trait TemperatureSensor {
    /// Take one measurement, in units of 0.25 °C.
    ///
    /// # Errors
    ///
    /// Returns an error if the sensor cannot be read.
    fn read_raw(&mut self) -> Result<i32>;
}

/// A sensor that always reports the same raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSensor {
    raw: i32,
}

impl FixedSensor {
    /// Create a sensor reporting `raw` quarter degrees.
    #[must_use]
    pub fn new(raw: i32) -> Self {
        Self { raw }
    }
}

impl TemperatureSensor for FixedSensor {
    fn read_raw(&mut self) -> Result<i32> {
        Ok(self.raw)
    }
}

/// One temperature sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading {
    /// Temperature in whole degrees Celsius, truncated toward zero.
    pub celsius: i32,
    /// When the sample was taken.
    pub taken_at: DateTime<Utc>,
}

impl Reading {
    /// Build a reading from a raw quarter-degree value taken now.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        Self {
            celsius: raw / 4,
            taken_at: Utc::now(),
        }
    }

    /// The string stored in the log.
    #[must_use]
    pub fn to_payload(&self) -> String {
        self.celsius.to_string()
    }
}

/// Sample `sensor` and append the reading to `log`.
///
/// # Errors
///
/// Returns an error if the sensor fails or the append is rejected.
pub fn record_sample<M: Medium, S: TemperatureSensor>(
    log: &mut LogHandle<M>,
    sensor: &mut S,
) -> Result<Reading> {
    let reading = Reading::from_raw(sensor.read_raw()?);
    log.append(&reading.to_payload())?;
    info!(
        "Recorded {} °C taken at {}",
        reading.celsius,
        reading.taken_at.to_rfc3339()
    );
    Ok(reading)
}
