use crate::mac_address::MacAddress;
use crate::measurement::Measurement;
use std::time::SystemTime;

/// Address carried by [`sample_frame`].
pub const SAMPLE_MAC: MacAddress = MacAddress([0xCB, 0xB8, 0x33, 0x4C, 0x88, 0x4F]);

/// One LE advertising report as `hcidump --raw` prints it.
pub const SAMPLE_DUMP: &str = "\
> 04 3E 2B 02 01 00 01 4F 88 4C 33 B8 CB 1F 02 01 06 1B FF 99
  04 05 12 FC 53 94 C3 7C 00 04 FF FC 04 0C AC 36 42 00 CD CB
  B8 33 4C 88 4F B5
";

/// The bytes of [`SAMPLE_DUMP`].
pub fn sample_frame() -> Vec<u8> {
    vec![
        0x04, 0x3E, 0x2B, 0x02, 0x01, 0x00, 0x01, // HCI event header, report type
        0x4F, 0x88, 0x4C, 0x33, 0xB8, 0xCB, // advertiser address (little-endian)
        0x1F, // AD length
        0x02, 0x01, 0x06, // flags
        0x1B, 0xFF, 0x99, 0x04, // manufacturer data, Ruuvi Innovations
        0x05, // data format 5
        0x12, 0xFC, // temperature: 24.30 C
        0x53, 0x94, // humidity: 53.49 %
        0xC3, 0x7C, // pressure: 100044 Pa
        0x00, 0x04, // acceleration x
        0xFF, 0xFC, // acceleration y
        0x04, 0x0C, // acceleration z
        0xAC, 0x36, // battery 2.977 V, tx power 4 dBm
        0x42, // movement counter: 66
        0x00, 0xCD, // sequence: 205
        0xCB, 0xB8, 0x33, 0x4C, 0x88, 0x4F, // address
        0xB5, // rssi: -75
    ]
}

/// [`sample_frame`] with `bytes` written at `offset`.
pub fn frame_with(offset: usize, bytes: &[u8]) -> Vec<u8> {
    let mut frame = sample_frame();
    frame[offset..offset + bytes.len()].copy_from_slice(bytes);
    frame
}

/// A fixed measurement for forwarding tests.
pub fn base_measurement(mac: MacAddress, timestamp: SystemTime) -> Measurement {
    Measurement {
        mac,
        timestamp,
        temperature: 24.3,
        humidity: 53.49,
        pressure: 100_044.0,
        acceleration: (0.0, 0.0, 1.0),
        battery: 2.977,
        tx_power: 4,
        movement_counter: 66,
        measurement_sequence: 205,
        rssi: -75,
    }
}
