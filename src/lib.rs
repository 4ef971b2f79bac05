//! `ruuvigate` library.
//!
//! The binary (`src/main.rs`) is responsible for logging setup and process
//! exit codes. Frame reassembly, decoding and forwarding live here, wired
//! together by [`crate::app`] where they can be tested with an in-memory
//! capture and a fake collector.

pub mod alias;
pub mod app;
pub mod capture;
pub mod config;
pub mod decoder;
pub mod envelope;
pub mod forwarder;
pub mod frame;
pub mod mac_address;
pub mod measurement;
pub mod throttle;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types at the crate root
pub use alias::{Alias, NameTable, UNNAMED, parse_alias};
pub use app::{Options, Pipeline, PipelineStats, RunError};
pub use config::Settings;
pub use decoder::{DecodeError, PressureUnit, decode, try_decode};
pub use envelope::{Envelope, TagRecord};
pub use forwarder::{Delivery, ForwardError, Forwarder, HttpTransport, Transport};
pub use frame::{FrameAssembler, RawFrame};
pub use mac_address::MacAddress;
pub use measurement::Measurement;
pub use throttle::{Throttle, parse_duration};
