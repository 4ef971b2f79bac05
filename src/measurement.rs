//! Decoded RuuviTag state.

use crate::mac_address::MacAddress;
use std::time::SystemTime;

/// One decoded sensor broadcast.
///
/// Units:
/// - Temperature in Celsius
/// - Humidity in percent (0-100)
/// - Pressure in Pascals, or hectopascals when decoded with
///   [`PressureUnit::Hpa`](crate::decoder::PressureUnit::Hpa)
/// - Acceleration as a fraction of standard gravity
/// - Battery voltage in Volts
/// - TX power and RSSI in dBm
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Address of the broadcasting tag
    pub mac: MacAddress,
    /// Wall-clock time the frame was decoded
    pub timestamp: SystemTime,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    /// Acceleration vector (x, y, z)
    pub acceleration: (f64, f64, f64),
    pub battery: f64,
    pub tx_power: i8,
    pub movement_counter: u8,
    pub measurement_sequence: u16,
    /// Signal strength of the advertisement as seen by the receiver
    pub rssi: i8,
}
