//! Bluetooth device address as carried in advertisement frames.
//!
//! Addresses are kept as the raw 6 bytes and only rendered to text at the
//! edges (name table lookups, the outbound envelope).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of bytes in a device address.
pub const MAC_LEN: usize = 6;

/// A device address in transmission order.
///
/// Renders as colon-separated upper-case hex, e.g. `AA:BB:CC:DD:EE:FF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress(pub [u8; MAC_LEN]);

impl MacAddress {
    /// Copy an address out of a frame, keeping the byte order as received.
    ///
    /// Returns `None` if fewer than six bytes remain at `offset`.
    pub fn from_frame(frame: &[u8], offset: usize) -> Option<Self> {
        let bytes = frame.get(offset..offset + MAC_LEN)?;
        let mut addr = [0u8; MAC_LEN];
        addr.copy_from_slice(bytes);
        Some(Self(addr))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// Errors returned when parsing an address string.
#[derive(Error, Debug, PartialEq)]
pub enum ParseMacError {
    #[error("invalid MAC address: expected 6 parts, got {0}")]
    InvalidLength(usize),
    #[error("invalid MAC address: part {0} has wrong length")]
    InvalidPartLength(usize),
    #[error("invalid MAC address: '{0}' is not valid hex")]
    InvalidHex(String),
}

impl FromStr for MacAddress {
    type Err = ParseMacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.trim().split(':').count();
        if parts != MAC_LEN {
            return Err(ParseMacError::InvalidLength(parts));
        }

        let mut addr = [0u8; MAC_LEN];
        for (i, (slot, part)) in addr.iter_mut().zip(s.trim().split(':')).enumerate() {
            if part.len() != 2 {
                return Err(ParseMacError::InvalidPartLength(i));
            }
            *slot = u8::from_str_radix(part, 16)
                .map_err(|_| ParseMacError::InvalidHex(part.to_string()))?;
        }
        Ok(Self(addr))
    }
}

impl From<[u8; MAC_LEN]> for MacAddress {
    fn from(bytes: [u8; MAC_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_upper_case() {
        let addr = MacAddress([0xaa, 0xbb, 0xcc, 0x0d, 0x0e, 0x0f]);
        assert_eq!(addr.to_string(), "AA:BB:CC:0D:0E:0F");
    }

    #[test]
    fn test_from_frame_keeps_byte_order() {
        let frame = [0x00, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x11];
        let addr = MacAddress::from_frame(&frame, 1).unwrap();
        assert_eq!(addr.to_string(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_from_frame_out_of_bounds() {
        let frame = [0u8; 8];
        assert_eq!(MacAddress::from_frame(&frame, 3), None);
    }

    #[test]
    fn test_parse_lowercase() {
        let addr: MacAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        assert_eq!(addr.0, [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "AA:BB:CC".parse::<MacAddress>(),
            Err(ParseMacError::InvalidLength(3))
        );
        assert_eq!(
            "AA:BB:CC:DD:EE:F".parse::<MacAddress>(),
            Err(ParseMacError::InvalidPartLength(5))
        );
        assert!(matches!(
            "AA:BB:CC:DD:EE:GG".parse::<MacAddress>(),
            Err(ParseMacError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_serde_as_string() {
        let addr = MacAddress([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"AA:BB:CC:DD:EE:FF\"");
        let back: MacAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
        assert!(serde_json::from_str::<MacAddress>("\"nope\"").is_err());
    }
}
