//! External capture utilities.
//!
//! Two things run next to the decode pipeline:
//! - a *listener* that keeps the controller in LE scan mode. It produces no
//!   data of its own and is never joined.
//! - `hcidump --raw`, whose stdout is the line stream the pipeline consumes.

#[cfg(feature = "bluer")]
pub mod bluer;

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::io::{AsyncBufRead, BufReader};
use tokio::process::{Child, Command};

/// Errors setting up the capture utilities.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} has no stdout")]
    NoStdout(&'static str),
    #[error("failed to open capture input: {0}")]
    Input(#[source] std::io::Error),
    /// Bluetooth/adapter related error
    #[cfg(feature = "bluer")]
    #[error("Bluetooth error: {0}")]
    Bluetooth(String),
}

/// Line stream produced by a capture source.
pub type CaptureReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// Available listener backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Listener {
    /// `hcitool lescan --duplicates --passive`
    #[default]
    Hcitool,
    /// BlueZ D-Bus discovery (requires bluetoothd)
    #[cfg(feature = "bluer")]
    Bluer,
    /// Do not start a listener; something else keeps the radio scanning
    None,
}

impl std::fmt::Display for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Listener::Hcitool => write!(f, "hcitool"),
            #[cfg(feature = "bluer")]
            Listener::Bluer => write!(f, "bluer"),
            Listener::None => write!(f, "none"),
        }
    }
}

const HCITOOL: &str = "hcitool";
const HCIDUMP: &str = "hcidump";

/// Start the background listener. The spawned task outlives this call and
/// only logs when the listener goes away.
pub async fn start_listener(listener: Listener) -> Result<(), CaptureError> {
    match listener {
        Listener::Hcitool => spawn_listener(HCITOOL, &["lescan", "--duplicates", "--passive"]),
        #[cfg(feature = "bluer")]
        Listener::Bluer => bluer::start_listener().await,
        Listener::None => Ok(()),
    }
}

fn spawn_listener(program: &'static str, args: &[&str]) -> Result<(), CaptureError> {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| CaptureError::Spawn { program, source })?;
    tokio::spawn(watch(program, child));
    Ok(())
}

/// Wait for a capture utility and log how it ended. A failed exit is an
/// error: the stream it fed stops with it.
async fn watch(program: &'static str, mut child: Child) -> Option<ExitStatus> {
    match child.wait().await {
        Ok(status) if status.success() => {
            tracing::warn!(program, %status, "exited");
            Some(status)
        }
        Ok(status) => {
            tracing::error!(program, %status, "exited with failure");
            Some(status)
        }
        Err(error) => {
            tracing::error!(program, %error, "failed waiting for child");
            None
        }
    }
}

/// Spawn `hcidump --raw` and return its stdout as a line stream.
pub fn spawn_capture() -> Result<CaptureReader, CaptureError> {
    let mut child = Command::new(HCIDUMP)
        .arg("--raw")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| CaptureError::Spawn {
            program: HCIDUMP,
            source,
        })?;
    let stdout = child.stdout.take().ok_or(CaptureError::NoStdout(HCIDUMP))?;
    tokio::spawn(watch(HCIDUMP, child));
    Ok(Box::new(BufReader::new(stdout)))
}

/// Open a recorded capture, `-` meaning stdin.
pub async fn open_input(path: &Path) -> Result<CaptureReader, CaptureError> {
    if path == Path::new("-") {
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }
    let file = tokio::fs::File::open(path)
        .await
        .map_err(CaptureError::Input)?;
    Ok(Box::new(BufReader::new(file)))
}
