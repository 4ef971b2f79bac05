//! Gateway settings file.
//!
//! ```json
//! {
//!   "gateway": "http://collector.local:8080/ruuvi",
//!   "gatewayId": "sauna-pi",
//!   "pressureUnit": "pa",
//!   "tags": [{ "id": "AA:BB:CC:DD:EE:FF", "name": "Sauna" }]
//! }
//! ```

use crate::alias::Alias;
use crate::decoder::PressureUnit;
use reqwest::Url;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid collector URL '{0}'")]
    InvalidEndpoint(String),
}

/// Settings shared by the forwarder and the name resolver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Collector URL. Delivery is disabled when unset.
    pub endpoint: Option<Url>,
    /// Identifier echoed in every envelope.
    pub gateway_id: Option<String>,
    pub pressure_unit: Option<PressureUnit>,
    pub tags: Vec<Alias>,
}

/// On-disk shape of [`Settings`], before the collector URL is checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    gateway: Option<String>,
    gateway_id: Option<String>,
    pressure_unit: Option<PressureUnit>,
    #[serde(default)]
    tags: Vec<Alias>,
}

/// Parse a collector URL, accepting only absolute http(s) URLs with a host.
/// Blank text means no collector.
pub fn parse_endpoint(text: &str) -> Result<Option<Url>, ConfigError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let invalid = || ConfigError::InvalidEndpoint(text.to_string());
    let url = Url::parse(text).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }
    Ok(Some(url))
}

impl Settings {
    /// Parse settings from JSON text.
    pub fn from_json(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let file: SettingsFile =
            serde_json::from_str(text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let endpoint = match file.gateway.as_deref() {
            Some(url) => parse_endpoint(url)?,
            None => None,
        };
        Ok(Settings {
            endpoint,
            gateway_id: file.gateway_id,
            pressure_unit: file.pressure_unit,
            tags: file.tags,
        })
    }

    /// Load settings from `path`. A missing file yields the defaults: no
    /// collector and an empty name table.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json(path, &text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "settings file not found, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}
