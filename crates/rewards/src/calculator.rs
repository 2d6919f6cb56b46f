//! Token award rules.

use std::ops::RangeInclusive;

use crate::Reading;

/// Battery level above which a reading earns the battery bonus.
const BATTERY_BONUS_THRESHOLD: f64 = 80.0;
const BATTERY_BONUS: i64 = 2;

/// Soil moisture band considered healthy.
const HEALTHY_MOISTURE: RangeInclusive<f64> = 20.0..=60.0;
const MOISTURE_BONUS: i64 = 3;

/// Computes the reward for a validated reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenCalculator {
    tokens_per_reading: u32,
}

impl TokenCalculator {
    /// Create a calculator with the given base reward per reading.
    pub fn new(tokens_per_reading: u32) -> Self {
        Self { tokens_per_reading }
    }

    /// Base reward per reading.
    pub fn tokens_per_reading(&self) -> u32 {
        self.tokens_per_reading
    }

    /// Tokens earned by a reading: the base rate plus any bonuses.
    ///
    /// Bonuses are independent:
    /// - battery level strictly above 80: +2
    /// - soil moisture within 20..=60: +3
    pub fn calculate(&self, reading: &Reading) -> i64 {
        let mut tokens = i64::from(self.tokens_per_reading);

        if reading.battery_level > BATTERY_BONUS_THRESHOLD {
            tokens += BATTERY_BONUS;
        }

        if HEALTHY_MOISTURE.contains(&reading.soil_moisture) {
            tokens += MOISTURE_BONUS;
        }

        tokens
    }
}
