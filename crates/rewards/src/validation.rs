//! Plausibility checks for sensor readings.

use std::ops::RangeInclusive;

use thiserror::Error;

use crate::Reading;

/// Accepted soil moisture, percent.
pub const SOIL_MOISTURE_RANGE: RangeInclusive<f64> = 0.0..=100.0;

/// Accepted temperature, °C (typical sensor operating range).
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = -40.0..=85.0;

/// Accepted tilt, degrees.
pub const TILT_RANGE: RangeInclusive<f64> = 0.0..=360.0;

/// Accepted battery level, percent.
pub const BATTERY_LEVEL_RANGE: RangeInclusive<f64> = 0.0..=100.0;

/// A reading field outside its accepted range.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} out of range: {value} (expected {min}..={max})")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// Check every field of a reading, reporting the first one out of range.
///
/// Fields are checked in the order soil moisture, temperature, tilt,
/// battery level. NaN and infinities never fall inside a range.
pub fn check_reading(reading: &Reading) -> Result<(), ValidationError> {
    check_field("soil_moisture", reading.soil_moisture, &SOIL_MOISTURE_RANGE)?;
    check_field("temperature", reading.temperature, &TEMPERATURE_RANGE)?;
    check_field("tilt", reading.tilt, &TILT_RANGE)?;
    check_field("battery_level", reading.battery_level, &BATTERY_LEVEL_RANGE)?;
    Ok(())
}

/// Whether every field of the reading is physically plausible.
pub fn is_valid_reading(reading: &Reading) -> bool {
    check_reading(reading).is_ok()
}

fn check_field(
    field: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<(), ValidationError> {
    if range.contains(&value) {
        return Ok(());
    }

    Err(ValidationError {
        field,
        value,
        min: *range.start(),
        max: *range.end(),
    })
}
