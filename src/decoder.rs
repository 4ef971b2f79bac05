//! Decoder for RuuviTag data format 5 advertisements.
//!
//! The decoder works on a whole HCI LE advertising report as reassembled by
//! [`FrameAssembler`](crate::frame::FrameAssembler), not on the bare
//! manufacturer payload, so all offsets below are relative to the HCI packet
//! type byte. Multi-byte fields are big-endian.
//!
//! See: https://github.com/ruuvi/ruuvi-sensor-protocols

use crate::mac_address::MacAddress;
use crate::measurement::Measurement;
use serde::Deserialize;
use std::time::SystemTime;
use thiserror::Error;

/// Shortest frame that carries every field.
pub const MIN_FRAME_LEN: usize = 46;

/// Ruuvi Innovations company ID (0x0499) as it appears on the wire.
pub const RUUVI_MANUFACTURER_ID_BYTES: [u8; 2] = [0x99, 0x04];

/// Data format advertised by frames this decoder understands.
pub const DATA_FORMAT: u8 = 5;

const MANUFACTURER_ID: usize = 19;
const TEMPERATURE: usize = 22;
const HUMIDITY: usize = 24;
const PRESSURE: usize = 26;
const ACCEL_X: usize = 28;
const ACCEL_Y: usize = 30;
const ACCEL_Z: usize = 32;
const POWER_INFO: usize = 34;
const MOVEMENT_COUNTER: usize = 36;
const SEQUENCE: usize = 37;
const ADDRESS: usize = 39;
const RSSI: usize = 45;

/// Reported unit for atmospheric pressure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PressureUnit {
    /// Pascals
    #[default]
    Pa,
    /// Hectopascals (Pa / 100)
    Hpa,
}

/// Why a frame did not yield a measurement.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("frame too short: {len} bytes")]
    TooShort { len: usize },
    #[error("not a Ruuvi frame: manufacturer bytes {0:02X?}")]
    UnknownManufacturer([u8; 2]),
}

fn u16_at(frame: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([frame[offset], frame[offset + 1]])
}

fn i16_at(frame: &[u8], offset: usize) -> i16 {
    i16::from_be_bytes([frame[offset], frame[offset + 1]])
}

fn temperature(frame: &[u8]) -> f64 {
    f64::from(u16_at(frame, TEMPERATURE)) * 0.005
}

fn humidity(frame: &[u8]) -> f64 {
    f64::from(u16_at(frame, HUMIDITY)) * 0.0025
}

fn pressure(frame: &[u8], unit: PressureUnit) -> f64 {
    let pascals = f64::from(u32::from(u16_at(frame, PRESSURE)) + 50_000);
    match unit {
        PressureUnit::Pa => pascals,
        PressureUnit::Hpa => pascals / 100.0,
    }
}

fn acceleration(frame: &[u8], offset: usize) -> f64 {
    f64::from(i16_at(frame, offset)) / 32767.0
}

/// Battery voltage lives in the upper 11 bits of the power word.
fn battery(frame: &[u8]) -> f64 {
    f64::from(u16_at(frame, POWER_INFO) >> 5) / 1000.0 + 1.6
}

/// TX power lives in the lower 5 bits, in 2 dBm steps from -40 dBm.
fn tx_power(frame: &[u8]) -> i8 {
    // 0x1F * 2 - 40 = 22, always in range
    ((u16_at(frame, POWER_INFO) & 0x1F) as i8) * 2 - 40
}

/// Decode a frame, reporting why it was rejected.
///
/// `now` stamps the measurement; decoding is otherwise a pure function of
/// `frame`.
pub fn try_decode_at(
    frame: &[u8],
    unit: PressureUnit,
    now: SystemTime,
) -> Result<Measurement, DecodeError> {
    if frame.len() < MIN_FRAME_LEN {
        return Err(DecodeError::TooShort { len: frame.len() });
    }

    let id = [frame[MANUFACTURER_ID], frame[MANUFACTURER_ID + 1]];
    if id != RUUVI_MANUFACTURER_ID_BYTES {
        return Err(DecodeError::UnknownManufacturer(id));
    }

    let mac = MacAddress::from_frame(frame, ADDRESS).ok_or(DecodeError::TooShort {
        len: frame.len(),
    })?;

    Ok(Measurement {
        mac,
        timestamp: now,
        temperature: temperature(frame),
        humidity: humidity(frame),
        pressure: pressure(frame, unit),
        acceleration: (
            acceleration(frame, ACCEL_X),
            acceleration(frame, ACCEL_Y),
            acceleration(frame, ACCEL_Z),
        ),
        battery: battery(frame),
        tx_power: tx_power(frame),
        movement_counter: frame[MOVEMENT_COUNTER],
        measurement_sequence: u16_at(frame, SEQUENCE),
        rssi: frame[RSSI] as i8,
    })
}

/// [`try_decode_at`] stamped with the current time.
pub fn try_decode(frame: &[u8], unit: PressureUnit) -> Result<Measurement, DecodeError> {
    try_decode_at(frame, unit, SystemTime::now())
}

/// Decode a frame, or `None` if it is not a Ruuvi broadcast.
pub fn decode(frame: &[u8], unit: PressureUnit) -> Option<Measurement> {
    try_decode(frame, unit).ok()
}
