//! Reading validation and token reward rules.
//!
//! Both halves are pure functions over a [`Reading`]:
//!
//! - [`check_reading`] / [`is_valid_reading`] - reject physically implausible values
//! - [`TokenCalculator`] - base rate plus additive quality bonuses
//!
//! # Example
//!
//! ```rust
//! use rewards::{is_valid_reading, Reading, TokenCalculator};
//!
//! let reading = Reading {
//!     soil_moisture: 45.0,
//!     temperature: 22.0,
//!     tilt: 5.0,
//!     battery_level: 90.0,
//! };
//!
//! assert!(is_valid_reading(&reading));
//! assert_eq!(TokenCalculator::new(10).calculate(&reading), 15);
//! ```

mod calculator;
mod reading;
mod validation;

pub use calculator::TokenCalculator;
pub use reading::Reading;
pub use validation::{
    check_reading, is_valid_reading, ValidationError, BATTERY_LEVEL_RANGE, SOIL_MOISTURE_RANGE,
    TEMPERATURE_RANGE, TILT_RANGE,
};
