//! Operator-assigned names for RuuviTag devices.
//!
//! The table is built once at startup from the settings file and `--alias`
//! flags and is read-only afterwards.

use crate::mac_address::MacAddress;
use serde::Deserialize;

/// Label reported for tags without an entry in the table.
pub const UNNAMED: &str = "unnamed";

/// A single address-to-name mapping.
///
/// Deserializes from the settings file's `{ "id": ..., "name": ... }` entries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Alias {
    /// The device address (e.g., "AA:BB:CC:DD:EE:FF")
    #[serde(rename = "id")]
    pub address: MacAddress,
    /// The human-readable name (e.g., "Sauna")
    pub name: String,
}

/// Parse an alias from a string in the format "MAC=NAME".
///
/// # Example
/// ```
/// use ruuvigate::alias::parse_alias;
///
/// let alias = parse_alias("AA:BB:CC:DD:EE:FF=Kitchen").unwrap();
/// assert_eq!(alias.address.to_string(), "AA:BB:CC:DD:EE:FF");
/// assert_eq!(alias.name, "Kitchen");
/// ```
pub fn parse_alias(src: &str) -> Result<Alias, String> {
    let (address, name) = src
        .split_once('=')
        .ok_or_else(|| "invalid alias: expected format MAC=NAME".to_string())?;
    let address = address.parse().map_err(|e| format!("invalid alias: {e}"))?;
    Ok(Alias {
        address,
        name: name.into(),
    })
}

/// Ordered address-to-name table. Lookups are linear and the first matching
/// entry wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameTable {
    entries: Vec<Alias>,
}

impl NameTable {
    pub fn new(entries: Vec<Alias>) -> Self {
        Self { entries }
    }

    /// The label for `mac`, or [`UNNAMED`].
    pub fn resolve(&self, mac: &MacAddress) -> &str {
        self.entries
            .iter()
            .find(|alias| alias.address == *mac)
            .map_or(UNNAMED, |alias| alias.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Alias> for NameTable {
    fn from_iter<I: IntoIterator<Item = Alias>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
