//! Core application runner (business logic) for `ruuvigate`.
//!
//! This module is decoupled from process setup and exit codes so the line
//! pipeline can be driven from an in-memory capture and a fake collector.

use crate::alias::{Alias, NameTable};
use crate::capture::{self, CaptureError, Listener};
use crate::config::{ConfigError, Settings};
use crate::decoder::{self, PressureUnit};
use crate::forwarder::{
    DEFAULT_TIMEOUT, Delivery, ForwardError, Forwarder, HttpTransport, Transport,
};
use crate::frame::FrameAssembler;
use crate::throttle::Throttle;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Command-line options.
#[derive(Parser, Debug, Clone)]
#[command(author, about, version)]
pub struct Options {
    /// Settings file with the collector URL and tag names.
    #[arg(long, default_value = "settings.json")]
    pub config: PathBuf,

    /// Human-readable name for a tag, taking precedence over the settings file.
    /// Format: --alias DE:AD:BE:EF:00:00=Sauna
    #[arg(long = "alias", value_parser = crate::alias::parse_alias, value_name = "ALIAS")]
    pub aliases: Vec<Alias>,

    /// Verbose output: log payloads, collector responses and skipped frames
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Forward at most one measurement per tag per interval.
    /// Accepts duration with suffix: 3s, 1m, 500ms, 2h.
    /// Without suffix, value is interpreted as seconds.
    #[arg(long, value_parser = crate::throttle::parse_duration)]
    pub throttle: Option<Duration>,

    /// Unit for reported pressure (overrides the settings file, default pa)
    #[arg(long, value_enum)]
    pub pressure_unit: Option<PressureUnit>,

    /// Upper bound for a single delivery to the collector.
    #[arg(long, value_parser = crate::throttle::parse_duration, default_value = "10s")]
    pub timeout: Duration,

    /// Replay a recorded hcidump capture instead of running hcidump ("-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// How to keep the radio scanning while hcidump runs
    #[arg(long, default_value_t, value_enum)]
    pub listener: Listener,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config: PathBuf::from("settings.json"),
            aliases: Vec::new(),
            verbose: false,
            throttle: None,
            pressure_unit: None,
            timeout: DEFAULT_TIMEOUT,
            input: None,
            listener: Listener::default(),
        }
    }
}

/// Errors returned by the core run loop.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Forward(#[from] ForwardError),
    #[error("failed to read capture: {0}")]
    Io(#[from] io::Error),
}

/// Counters for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Completed frames handed to the decoder
    pub frames: u64,
    pub decoded: u64,
    pub throttled: u64,
    pub delivered: u64,
    pub failed: u64,
}

/// The sequential feed, decode, resolve, deliver loop.
pub struct Pipeline<'a> {
    names: &'a NameTable,
    forwarder: &'a Forwarder,
    unit: PressureUnit,
    throttle: Option<Throttle>,
    assembler: FrameAssembler,
    stats: PipelineStats,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        names: &'a NameTable,
        forwarder: &'a Forwarder,
        unit: PressureUnit,
        throttle: Option<Duration>,
    ) -> Self {
        Self {
            names,
            forwarder,
            unit,
            throttle: throttle.map(Throttle::new),
            assembler: FrameAssembler::new(),
            stats: PipelineStats::default(),
        }
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// Process one capture line. Delivery happens inline, so a slow
    /// collector holds up the next line.
    pub async fn handle_line(&mut self, line: &str) {
        let Some(frame) = self.assembler.feed(line) else {
            return;
        };
        self.stats.frames += 1;

        let measurement = match decoder::try_decode(&frame, self.unit) {
            Ok(measurement) => measurement,
            Err(reason) => {
                tracing::debug!(%reason, "skipping frame");
                return;
            }
        };
        self.stats.decoded += 1;

        if let Some(throttle) = self.throttle.as_mut()
            && !throttle.should_emit(measurement.mac)
        {
            self.stats.throttled += 1;
            return;
        }

        let names = self.names;
        let name = names.resolve(&measurement.mac);
        tracing::debug!(
            name,
            mac = %measurement.mac,
            temperature = measurement.temperature,
            humidity = measurement.humidity,
            pressure = measurement.pressure,
            movement = measurement.movement_counter,
            "decoded measurement"
        );

        match self.forwarder.deliver(&measurement, name).await {
            Ok(Delivery::Sent(_)) => self.stats.delivered += 1,
            Ok(Delivery::Disabled) => {}
            Err(error) => {
                self.stats.failed += 1;
                tracing::warn!(%error, mac = %measurement.mac, "dropping measurement");
            }
        }
    }

    /// Drain `reader` until end of input. A record still being assembled
    /// when the input ends is dropped.
    pub async fn run<R: AsyncBufRead + Unpin>(
        mut self,
        mut reader: R,
    ) -> io::Result<PipelineStats> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            self.handle_line(line.trim_end_matches(['\r', '\n'])).await;
        }
        Ok(self.stats)
    }
}

/// Build the name table: `--alias` entries first, then the settings file.
pub fn name_table(aliases: &[Alias], settings: &Settings) -> NameTable {
    aliases.iter().chain(&settings.tags).cloned().collect()
}

/// Run the pipeline over `reader`, delivering through `transport`.
pub async fn run_with_io<R: AsyncBufRead + Unpin>(
    options: &Options,
    settings: &Settings,
    reader: R,
    transport: Box<dyn Transport>,
) -> Result<PipelineStats, RunError> {
    let names = name_table(&options.aliases, settings);
    let unit = options
        .pressure_unit
        .or(settings.pressure_unit)
        .unwrap_or_default();
    let forwarder = Forwarder::new(
        settings.endpoint.clone(),
        settings.gateway_id.clone(),
        transport,
    );
    if !forwarder.is_enabled() {
        tracing::warn!("no collector configured, measurements are decoded but not forwarded");
    }
    tracing::info!(tags = names.len(), ?unit, "pipeline started");

    let stats = Pipeline::new(&names, &forwarder, unit, options.throttle)
        .run(reader)
        .await?;
    tracing::info!(?stats, "capture ended");
    Ok(stats)
}

/// Load settings, start the capture utilities and run until the capture ends.
pub async fn run(options: Options) -> Result<PipelineStats, RunError> {
    let settings = Settings::load(&options.config)?;
    let transport = HttpTransport::new(options.timeout)?;

    let reader = match &options.input {
        Some(path) => capture::open_input(path).await?,
        None => {
            keep_scanning(options.listener, capture::start_listener(options.listener)).await;
            capture::spawn_capture()?
        }
    };

    run_with_io(&options, &settings, reader, Box::new(transport)).await
}

/// A listener that fails to start is logged and otherwise ignored: the
/// controller may already be scanning, and `hcidump` decides whether any
/// data arrives.
async fn keep_scanning<F>(listener: Listener, start: F) -> bool
where
    F: Future<Output = Result<(), CaptureError>>,
{
    match start.await {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(%listener, %error, "listener not started, continuing without it");
            false
        }
    }
}
