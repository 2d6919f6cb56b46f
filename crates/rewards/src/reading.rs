/// The four sensor values carried by one measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reading {
    /// Soil moisture, percent.
    pub soil_moisture: f64,
    /// Air temperature, °C.
    pub temperature: f64,
    /// Trunk tilt, degrees.
    pub tilt: f64,
    /// Battery level, percent.
    pub battery_level: f64,
}
