//! BlueZ D-Bus listener.
//!
//! Keeps the default adapter powered and discovering so that `hcidump` sees
//! advertisements, without depending on the deprecated `hcitool`. Requires
//! the `bluetoothd` daemon to be running.

use super::CaptureError;
use bluer::{AdapterEvent, DiscoveryFilter, DiscoveryTransport, Session};
use futures::StreamExt;

impl From<bluer::Error> for CaptureError {
    fn from(err: bluer::Error) -> Self {
        CaptureError::Bluetooth(err.to_string())
    }
}

/// Power the default adapter and keep an LE discovery session open.
pub async fn start_listener() -> Result<(), CaptureError> {
    let session = Session::new().await?;
    let adapter = session.default_adapter().await?;
    adapter.set_powered(true).await?;
    adapter
        .set_discovery_filter(DiscoveryFilter {
            transport: DiscoveryTransport::Le,
            duplicate_data: true,
            ..Default::default()
        })
        .await?;

    let mut events = Box::pin(adapter.discover_devices_with_changes().await?);
    tracing::info!(adapter = adapter.name(), "discovery started");

    tokio::spawn(async move {
        // Discovery stops when the session or stream is dropped
        let _session = session;
        while let Some(event) = events.next().await {
            if let AdapterEvent::DeviceAdded(address) = event {
                tracing::trace!(%address, "device seen");
            }
        }
        tracing::warn!("discovery stream ended");
    });

    Ok(())
}
