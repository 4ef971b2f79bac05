//! JSON document posted to the collector.

use crate::decoder::DATA_FORMAT;
use crate::mac_address::MacAddress;
use crate::measurement::Measurement;
use serde::Serialize;
use std::time::SystemTime;
use time::OffsetDateTime;

/// One tag entry of an [`Envelope`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRecord {
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
    pub connectable: bool,
    pub data_format: u8,
    pub humidity: f64,
    pub humidity_offset: f64,
    pub id: MacAddress,
    #[serde(rename = "measurementSequenceNumber")]
    pub sequence: u16,
    pub movement_counter: u8,
    pub name: String,
    pub pressure: f64,
    pub rssi: i8,
    pub temperature: f64,
    pub tx_power: i8,
    #[serde(with = "time::serde::rfc3339")]
    pub update_at: OffsetDateTime,
    pub voltage: f64,
}

impl TagRecord {
    pub fn new(measurement: &Measurement, name: &str) -> Self {
        let (accel_x, accel_y, accel_z) = measurement.acceleration;
        Self {
            accel_x,
            accel_y,
            accel_z,
            connectable: false,
            data_format: DATA_FORMAT,
            humidity: measurement.humidity,
            humidity_offset: 0.0,
            id: measurement.mac,
            sequence: measurement.measurement_sequence,
            movement_counter: measurement.movement_counter,
            name: name.to_string(),
            pressure: measurement.pressure,
            rssi: measurement.rssi,
            temperature: measurement.temperature,
            tx_power: measurement.tx_power,
            update_at: OffsetDateTime::from(measurement.timestamp),
            voltage: measurement.battery,
        }
    }
}

/// Wrapper around the tag records of one delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub tags: Vec<TagRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    pub battery_level: u8,
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
}

impl Envelope {
    /// Envelope carrying a single measurement.
    pub fn single(
        measurement: &Measurement,
        name: &str,
        gateway: Option<&str>,
        now: SystemTime,
    ) -> Self {
        Self {
            tags: vec![TagRecord::new(measurement, name)],
            gateway: gateway.map(str::to_string),
            battery_level: 0,
            time: OffsetDateTime::from(now),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{SAMPLE_MAC, base_measurement};
    use serde_json::{Value, json};
    use std::time::Duration;

    fn sample_json(gateway: Option<&str>) -> Value {
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let measurement = base_measurement(SAMPLE_MAC, stamp);
        let envelope = Envelope::single(&measurement, "Sauna", gateway, stamp);
        serde_json::from_slice(&envelope.to_json().unwrap()).unwrap()
    }

    #[test]
    fn test_envelope_shape() {
        let value = sample_json(None);
        assert_eq!(value["batteryLevel"], json!(0));
        assert_eq!(value["time"], json!("2023-11-14T22:13:20Z"));
        assert!(value.get("gateway").is_none());

        let tags = value["tags"].as_array().unwrap();
        assert_eq!(tags.len(), 1);
        let tag = &tags[0];
        assert_eq!(tag["id"], json!("CB:B8:33:4C:88:4F"));
        assert_eq!(tag["name"], json!("Sauna"));
        assert_eq!(tag["dataFormat"], json!(5));
        assert_eq!(tag["connectable"], json!(false));
        assert_eq!(tag["humidityOffset"], json!(0.0));
        assert_eq!(tag["measurementSequenceNumber"], json!(205));
        assert_eq!(tag["movementCounter"], json!(66));
        assert_eq!(tag["rssi"], json!(-75));
        assert_eq!(tag["txPower"], json!(4));
        assert_eq!(tag["temperature"], json!(24.3));
        assert_eq!(tag["voltage"], json!(2.977));
        assert_eq!(tag["accelZ"], json!(1.0));
        assert_eq!(tag["updateAt"], json!("2023-11-14T22:13:20Z"));
    }

    #[test]
    fn test_gateway_id_is_included_when_set() {
        assert_eq!(sample_json(Some("pi"))["gateway"], json!("pi"));
    }
}
